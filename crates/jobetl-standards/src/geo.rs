//! City and country reference.

use std::collections::BTreeMap;
use std::path::Path;

use jobetl_model::{Coordinate, MatchingMode, Value};

use crate::csv_utils::{get_field, get_optional, parse_number, read_csv_rows};
use crate::error::ReferenceError;
use crate::keys::{compact_key, lookup_key};

#[derive(Debug, Clone, PartialEq)]
pub struct CountryRef {
    pub name: String,
    pub iso_code: String,
    pub latitude: Value<Coordinate>,
    pub longitude: Value<Coordinate>,
    pub population: Value<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityRef {
    pub name: String,
    pub country_code: String,
}

/// Geographic reference: cities, their aliases and countries.
#[derive(Debug, Clone, Default)]
pub struct GeoReference {
    countries: Vec<CountryRef>,
    country_by_name: BTreeMap<String, usize>,
    country_by_code: BTreeMap<String, usize>,
    /// Same-named cities in different countries share a key.
    cities: BTreeMap<String, Vec<CityRef>>,
    /// Alias spelling to canonical city name.
    city_aliases: BTreeMap<String, String>,
}

impl GeoReference {
    pub fn load(
        countries_path: &Path,
        cities_path: &Path,
        aliases_path: &Path,
    ) -> Result<Self, ReferenceError> {
        let mut geo = Self::default();

        for row in read_csv_rows(
            countries_path,
            &[
                "country_name",
                "country_code",
                "latitude",
                "longitude",
                "population",
            ],
        )? {
            let name = get_field(&row, "country_name");
            let code = get_field(&row, "country_code").to_ascii_uppercase();
            if name.is_empty() || code.is_empty() {
                continue;
            }
            let coordinate = |column: &str| -> Result<Value<Coordinate>, ReferenceError> {
                match get_optional(&row, column) {
                    None => Ok(Value::NotAvailable),
                    Some(cell) => {
                        let degrees: f64 = parse_number(countries_path, column, cell)?;
                        Ok(Coordinate::new(degrees).into())
                    }
                }
            };
            let population = match get_optional(&row, "population") {
                None => Value::NotAvailable,
                Some(cell) => Value::Known(parse_number(countries_path, "population", cell)?),
            };
            let country = CountryRef {
                name: name.to_string(),
                iso_code: code.clone(),
                latitude: coordinate("latitude")?,
                longitude: coordinate("longitude")?,
                population,
            };
            let index = geo.countries.len();
            geo.country_by_name.insert(lookup_key(name), index);
            geo.country_by_code.insert(code, index);
            geo.countries.push(country);
        }

        for row in read_csv_rows(cities_path, &["city_name", "country_code"])? {
            let name = get_field(&row, "city_name");
            if name.is_empty() {
                continue;
            }
            let code = get_field(&row, "country_code").to_ascii_uppercase();
            if !geo.country_by_code.contains_key(&code) {
                return Err(ReferenceError::UnknownCountry {
                    path: cities_path.to_path_buf(),
                    country: code,
                });
            }
            let entry = geo.cities.entry(lookup_key(name)).or_default();
            if !entry.iter().any(|city| city.country_code == code) {
                entry.push(CityRef {
                    name: name.to_string(),
                    country_code: code,
                });
            }
        }

        for row in read_csv_rows(aliases_path, &["alias", "canonical_city"])? {
            let canonical = get_field(&row, "canonical_city");
            let Some(city) = geo
                .cities
                .get(&lookup_key(canonical))
                .and_then(|cities| cities.first())
            else {
                return Err(ReferenceError::illegal(aliases_path, "city", canonical));
            };
            let name = city.name.clone();
            geo.city_aliases.insert(lookup_key(get_field(&row, "alias")), name);
        }

        Ok(geo)
    }

    /// Canonical city name for a raw spelling: alias table first, then the
    /// city table itself.
    pub fn resolve_city(&self, raw: &str, mode: MatchingMode) -> Option<&str> {
        let key = lookup_key(raw);
        if let Some(name) = self.city_aliases.get(&key) {
            return Some(name.as_str());
        }
        if let Some(cities) = self.cities.get(&key) {
            return cities.first().map(|city| city.name.as_str());
        }
        if mode == MatchingMode::Lenient {
            let compact = compact_key(raw);
            if compact.is_empty() {
                return None;
            }
            if let Some((_, name)) = self
                .city_aliases
                .iter()
                .find(|(alias, _)| compact_key(alias) == compact)
            {
                return Some(name.as_str());
            }
            return self
                .cities
                .iter()
                .find(|(key, _)| compact_key(key) == compact)
                .and_then(|(_, cities)| cities.first())
                .map(|city| city.name.as_str());
        }
        None
    }

    /// Country for a canonical city name, only when the city name belongs to
    /// exactly one country.
    pub fn country_of_city(&self, city: &str) -> Option<&CountryRef> {
        let cities = self.cities.get(&lookup_key(city))?;
        match cities.as_slice() {
            [only] => self.country_by_iso(&only.country_code),
            _ => None,
        }
    }

    /// Country by name, or by ISO code.
    pub fn resolve_country(&self, raw: &str, mode: MatchingMode) -> Option<&CountryRef> {
        let key = lookup_key(raw);
        if let Some(&index) = self.country_by_name.get(&key) {
            return self.countries.get(index);
        }
        if let Some(country) = self.country_by_iso(raw.trim()) {
            return Some(country);
        }
        if mode == MatchingMode::Lenient {
            let compact = compact_key(raw);
            return self
                .countries
                .iter()
                .find(|country| !compact.is_empty() && compact_key(&country.name) == compact);
        }
        None
    }

    pub fn country_by_iso(&self, code: &str) -> Option<&CountryRef> {
        self.country_by_code
            .get(&code.to_ascii_uppercase())
            .and_then(|&index| self.countries.get(index))
    }

    /// Every city spelling (canonical names and aliases) with its canonical name.
    pub fn city_spellings(&self) -> impl Iterator<Item = (&str, &str)> {
        let names = self.cities.iter().filter_map(|(key, cities)| {
            cities
                .first()
                .map(|city| (key.as_str(), city.name.as_str()))
        });
        let aliases = self
            .city_aliases
            .iter()
            .map(|(alias, name)| (alias.as_str(), name.as_str()));
        names.chain(aliases)
    }

    pub fn countries(&self) -> &[CountryRef] {
        &self.countries
    }

    pub fn city_count(&self) -> usize {
        self.cities.values().map(Vec::len).sum()
    }

    pub fn city_alias_count(&self) -> usize {
        self.city_aliases.len()
    }
}
