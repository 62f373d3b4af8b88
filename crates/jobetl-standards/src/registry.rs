use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use jobetl_model::{
    CompanySize, EducationLevel, EmploymentType, Field, Industry, JobLevel, MatchingMode,
    RemoteOption, SkillCategory, SkillLevel, Value, raw_value,
};
use tracing::{debug, info};

use crate::csv_utils::{get_field, parse_number, read_csv_rows};
use crate::currency::CurrencyReference;
use crate::error::ReferenceError;
use crate::geo::GeoReference;
use crate::hash::sha256_hex;
use crate::manifest::{Manifest, ManifestFile};
use crate::roles::RoleTaxonomy;
use crate::signals::SignalKeywords;
use crate::skills::SkillReference;
use crate::table::{AliasTable, load_enum_table};

pub const MANIFEST_FILE: &str = "manifest.toml";

const MANIFEST_SCHEMA: &str = "jobetl.reference-manifest";

pub const REQUIRED_ROLES: &[&str] = &[
    "industry",
    "company_size",
    "education_level",
    "employment_type",
    "job_level",
    "skill_level",
    "skill_category",
    "currency",
    "currency_rate",
    "remote_option",
    "experience_code",
    "skill",
    "role",
    "role_rule",
    "city",
    "city_alias",
    "country",
    "signal_keyword",
];

const ALLOWED_KINDS: &[&str] = &["csv"];

/// Result of looking a raw value up in its field's reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    pub value: Value<String>,
    /// False when the raw spelling is unknown to the table (or the field has
    /// no table).
    pub matched: bool,
}

impl Canonical {
    fn matched(value: Value<String>) -> Self {
        Self {
            value,
            matched: true,
        }
    }

    fn unmatched() -> Self {
        Self {
            value: Value::NotAvailable,
            matched: false,
        }
    }
}

/// A verified manifest entry.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoadedFile {
    pub role: String,
    pub path: PathBuf,
    pub sha256: String,
    pub rows: usize,
}

/// Every reference table of a run, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct ReferenceRegistry {
    pub root: PathBuf,
    pub manifest: Manifest,
    pub files: Vec<LoadedFile>,
    mode: MatchingMode,
    pub industries: AliasTable<Industry>,
    pub company_sizes: AliasTable<CompanySize>,
    pub education_levels: AliasTable<EducationLevel>,
    pub employment_types: AliasTable<EmploymentType>,
    pub job_levels: AliasTable<JobLevel>,
    pub skill_levels: AliasTable<SkillLevel>,
    pub skill_categories: AliasTable<SkillCategory>,
    pub remote_options: AliasTable<RemoteOption>,
    pub experience_codes: AliasTable<f64>,
    pub currencies: CurrencyReference,
    pub skills: SkillReference,
    pub roles: RoleTaxonomy,
    pub geo: GeoReference,
    pub signals: SignalKeywords,
}

impl ReferenceRegistry {
    /// Load with lenient matching.
    pub fn load(root: &Path) -> Result<Self, ReferenceError> {
        Self::load_with_mode(root, MatchingMode::default())
    }

    pub fn load_with_mode(root: &Path, mode: MatchingMode) -> Result<Self, ReferenceError> {
        let manifest = load_manifest(&root.join(MANIFEST_FILE))?;
        validate_manifest(&manifest)?;

        let mut entries = manifest.files.clone();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        let mut files = Vec::with_capacity(entries.len());
        for entry in &entries {
            files.push(verify_file(root, entry)?);
        }

        let path = |role: &str| resolve_role_path(root, &entries, role);

        let registry = Self {
            root: root.to_path_buf(),
            mode,
            industries: load_enum_table(&path("industry")?)?,
            company_sizes: load_enum_table(&path("company_size")?)?,
            education_levels: load_enum_table(&path("education_level")?)?,
            employment_types: load_enum_table(&path("employment_type")?)?,
            job_levels: load_enum_table(&path("job_level")?)?,
            skill_levels: load_enum_table(&path("skill_level")?)?,
            skill_categories: load_enum_table(&path("skill_category")?)?,
            remote_options: load_enum_table(&path("remote_option")?)?,
            experience_codes: load_experience_codes(&path("experience_code")?)?,
            currencies: CurrencyReference::load(&path("currency")?, &path("currency_rate")?)?,
            skills: SkillReference::load(&path("skill")?)?,
            roles: RoleTaxonomy::load(&path("role")?, &path("role_rule")?)?,
            geo: GeoReference::load(&path("country")?, &path("city")?, &path("city_alias")?)?,
            signals: SignalKeywords::load(&path("signal_keyword")?)?,
            manifest,
            files,
        };

        info!(
            root = %root.display(),
            files = registry.files.len(),
            skills = registry.skills.len(),
            cities = registry.geo.city_count(),
            "reference tables loaded"
        );
        Ok(registry)
    }

    pub fn mode(&self) -> MatchingMode {
        self.mode
    }

    /// Canonical value for `raw` in `field`'s reference table.
    ///
    /// Values come out in their canonical spelling: enumeration labels,
    /// ISO currency codes, canonical city/country/skill names, or a number of
    /// years for experience codes.
    ///
    /// An absent input (blank or `__NA__`) is already canonical.
    pub fn canonicalize(&self, field: Field, raw: &str) -> Canonical {
        if raw_value(raw).is_na() {
            return Canonical::matched(Value::NotAvailable);
        }
        let mode = self.mode;
        let found = match field {
            Field::Industry => display(self.industries.lookup(raw, mode)),
            Field::CompanySize => display(self.company_sizes.lookup(raw, mode)),
            Field::EducationLevel => display(self.education_levels.lookup(raw, mode)),
            Field::EmploymentType => display(self.employment_types.lookup(raw, mode)),
            Field::JobLevel => display(self.job_levels.lookup(raw, mode)),
            Field::SkillLevelRequired => display(self.skill_levels.lookup(raw, mode)),
            Field::SkillCategory => display(self.skill_categories.lookup(raw, mode)),
            Field::RemoteOption => display(self.remote_options.lookup(raw, mode)),
            Field::RequiredExpYears => display(self.experience_codes.lookup(raw, mode)),
            Field::Currency => display(self.currencies.resolve(raw, mode)),
            Field::SkillName => self
                .skills
                .resolve(raw, mode)
                .map(|skill| Value::Known(skill.name.clone())),
            Field::RoleName => self
                .roles
                .exact(raw)
                .map(|role| Value::Known(role.as_str().to_string())),
            Field::City => self
                .geo
                .resolve_city(raw, mode)
                .map(|city| Value::Known(city.to_string())),
            Field::Country => self
                .geo
                .resolve_country(raw, mode)
                .map(|country| Value::Known(country.name.clone())),
            Field::CountryIso => self
                .geo
                .resolve_country(raw, mode)
                .map(|country| Value::Known(country.iso_code.clone())),
            _ => None,
        };
        found.map_or_else(Canonical::unmatched, Canonical::matched)
    }

    pub fn file(&self, role: &str) -> Option<&LoadedFile> {
        self.files.iter().find(|file| file.role == role)
    }
}

fn display<T: std::fmt::Display>(value: Option<&Value<T>>) -> Option<Value<String>> {
    value.map(|value| value.as_ref().map(ToString::to_string))
}

fn load_experience_codes(path: &Path) -> Result<AliasTable<f64>, ReferenceError> {
    let mut table = AliasTable::new();
    for row in read_csv_rows(path, &["alias", "years"])? {
        let years: f64 = parse_number(path, "years", get_field(&row, "years"))?;
        if !years.is_finite() || years < 0.0 {
            return Err(ReferenceError::InvalidNumber {
                path: path.to_path_buf(),
                column: "years".to_string(),
                value: years.to_string(),
            });
        }
        table.insert(path, get_field(&row, "alias"), Value::Known(years))?;
    }
    Ok(table)
}

fn load_manifest(path: &Path) -> Result<Manifest, ReferenceError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ReferenceError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| ReferenceError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &Manifest) -> Result<(), ReferenceError> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(ReferenceError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != 1 {
        return Err(ReferenceError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }

    let mut roles: BTreeSet<&str> = BTreeSet::new();
    for file in &manifest.files {
        if !roles.insert(file.role.as_str()) {
            return Err(ReferenceError::DuplicateRole {
                role: file.role.clone(),
            });
        }
        if !ALLOWED_KINDS.contains(&file.kind.as_str()) {
            return Err(ReferenceError::InvalidManifest {
                message: format!("unsupported kind '{}' for {}", file.kind, file.path),
            });
        }
        if let Some(sha) = &file.sha256 {
            validate_sha(sha, &file.path)?;
        }
        validate_path(&file.path)?;
    }

    for role in REQUIRED_ROLES {
        if !roles.contains(role) {
            return Err(ReferenceError::MissingRole {
                role: (*role).to_string(),
            });
        }
    }
    Ok(())
}

fn verify_file(root: &Path, file: &ManifestFile) -> Result<LoadedFile, ReferenceError> {
    let full_path = root.join(&file.path);
    let bytes = std::fs::read(&full_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ReferenceError::MissingFile {
                path: full_path.clone(),
            }
        } else {
            ReferenceError::io(full_path.clone(), e)
        }
    })?;

    let actual = sha256_hex(&bytes);
    if let Some(expected) = &file.sha256 {
        let expected = expected.to_ascii_lowercase();
        if actual != expected {
            return Err(ReferenceError::Sha256Mismatch {
                path: full_path,
                expected,
                actual,
            });
        }
    }

    let rows = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes.as_slice())
        .records()
        .count();
    debug!(role = %file.role, path = %full_path.display(), rows, "verified reference file");

    Ok(LoadedFile {
        role: file.role.clone(),
        path: full_path,
        sha256: actual,
        rows,
    })
}

fn resolve_role_path(
    root: &Path,
    files: &[ManifestFile],
    role: &str,
) -> Result<PathBuf, ReferenceError> {
    let f = files
        .iter()
        .find(|f| f.role == role)
        .ok_or_else(|| ReferenceError::MissingRole {
            role: role.to_string(),
        })?;
    Ok(root.join(&f.path))
}

fn validate_sha(sha: &str, path: &str) -> Result<(), ReferenceError> {
    if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ReferenceError::InvalidSha256 {
            path: PathBuf::from(path),
            message: "expected 64 hex characters".to_string(),
        });
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<(), ReferenceError> {
    let candidate = Path::new(path);
    let escapes = candidate
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if path.is_empty() || escapes {
        return Err(ReferenceError::InvalidManifest {
            message: format!("path must be relative to the reference root: {path}"),
        });
    }
    Ok(())
}
