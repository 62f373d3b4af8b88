//! Closed enumerations of the target schema.
//!
//! Each enumeration is the complete legal value set for its field. Reference
//! tables are checked against these at load time, so a canonical value that
//! reaches a record is always one of the members below (or the sentinel).
//!
//! Ordering follows the canonical spelling, which is the order bridge rows
//! and aggregations are emitted in.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::field::Field;

/// Shared surface of every closed enumeration.
pub trait Enumerated: Sized + Copy + PartialEq + fmt::Display + 'static {
    /// Canonical field the enumeration constrains.
    const FIELD: Field;

    fn all() -> &'static [Self];

    fn as_str(&self) -> &'static str;

    /// Exact match on the canonical spelling.
    fn from_canonical(value: &str) -> Option<Self> {
        Self::all().iter().copied().find(|member| member.as_str() == value)
    }
}

macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident for $field:expr => {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl Enumerated for $name {
            const FIELD: Field = $field;

            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn as_str(&self) -> &'static str {
                $name::as_str(self)
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.as_str().cmp(other.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as Enumerated>::from_canonical(s.trim()).ok_or_else(|| {
                    ModelError::NotInEnumeration {
                        field: $field.name(),
                        value: s.to_string(),
                    }
                })
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

closed_enum! {
    /// Category of a skill in the skills dimension.
    SkillCategory for Field::SkillCategory => {
        Programming => "Programming",
        DataEngineering => "Data Engineering",
        MachineLearning => "Machine Learning",
        Cloud => "Cloud",
        Visualization => "Visualization",
        Database => "Database",
        DevOps => "DevOps",
        Analytics => "Analytics",
    }
}

closed_enum! {
    CompanySize for Field::CompanySize => {
        Startup => "Startup",
        Small => "Small",
        Medium => "Medium",
        Large => "Large",
        Enterprise => "Enterprise",
    }
}

closed_enum! {
    Industry for Field::Industry => {
        Technology => "Technology",
        Finance => "Finance",
        Banking => "Banking",
        Insurance => "Insurance",
        Healthcare => "Healthcare",
        Education => "Education",
        ECommerce => "E-commerce",
        Manufacturing => "Manufacturing",
        Consulting => "Consulting",
        Government => "Government",
        Telecommunications => "Telecommunications",
        Energy => "Energy",
        Retail => "Retail",
        Logistics => "Logistics",
        RealEstate => "Real Estate",
    }
}

closed_enum! {
    /// Canonical role taxonomy. Titles outside it are dropped, never invented.
    RoleName for Field::RoleName => {
        DataAnalyst => "Data Analyst",
        BusinessIntelligenceAnalyst => "Business Intelligence Analyst",
        BiDeveloper => "BI Developer",
        AnalyticsEngineer => "Analytics Engineer",
        DataEngineer => "Data Engineer",
        DataScientist => "Data Scientist",
        MachineLearningEngineer => "Machine Learning Engineer",
        AiEngineer => "AI Engineer",
        AiResearcher => "AI Researcher",
        AppliedScientist => "Applied Scientist",
        ResearchEngineer => "Research Engineer",
        DataArchitect => "Data Architect",
        DataManager => "Data Manager",
        DataLead => "Data Lead",
    }
}

closed_enum! {
    EducationLevel for Field::EducationLevel => {
        HighSchool => "High School",
        Bachelor => "Bachelor",
        Master => "Master",
        PhD => "PhD",
    }
}

closed_enum! {
    EmploymentType for Field::EmploymentType => {
        FullTime => "Full-time",
        PartTime => "Part-time",
        Internship => "Internship",
        Temporary => "Temporary",
    }
}

closed_enum! {
    JobLevel for Field::JobLevel => {
        Intern => "Intern",
        Junior => "Junior",
        Mid => "Mid",
        Senior => "Senior",
        Lead => "Lead",
    }
}

closed_enum! {
    /// Three-state work mode; "not specified" is the sentinel, never `Onsite`.
    RemoteOption for Field::RemoteOption => {
        Onsite => "Onsite",
        Hybrid => "Hybrid",
        Remote => "Remote",
    }
}

closed_enum! {
    SkillLevel for Field::SkillLevelRequired => {
        Beginner => "Beginner",
        Intermediate => "Intermediate",
        Advanced => "Advanced",
        Expert => "Expert",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_canonical_spelling() {
        let mut roles = vec![
            RoleName::DataScientist,
            RoleName::AiEngineer,
            RoleName::BiDeveloper,
        ];
        roles.sort();
        let labels: Vec<&str> = roles.iter().map(RoleName::as_str).collect();
        assert_eq!(labels, vec!["AI Engineer", "BI Developer", "Data Scientist"]);
    }

    #[test]
    fn from_str_is_exact_on_canonical_spelling() {
        assert_eq!("E-commerce".parse::<Industry>(), Ok(Industry::ECommerce));
        assert!("ecommerce".parse::<Industry>().is_err());
        assert_eq!(
            "Widgetmaking".parse::<Industry>(),
            Err(ModelError::NotInEnumeration {
                field: "industry",
                value: "Widgetmaking".to_string(),
            })
        );
    }

    #[test]
    fn every_member_round_trips_through_its_label() {
        for size in CompanySize::ALL {
            assert_eq!(CompanySize::from_canonical(size.as_str()), Some(*size));
        }
        assert_eq!(<JobLevel as Enumerated>::FIELD, Field::JobLevel);
    }
}
