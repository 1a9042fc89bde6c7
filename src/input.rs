//! Raw request attributes describing an insured individual.
//!
//! Categories are closed enums. Text labels coming from a form or command
//! line are parsed into them up front, so an unknown label fails with
//! [`MedcostError::UnrecognizedCategory`] before any encoding happens.

use crate::error::{MedcostError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inclusive range accepted for `age`.
pub const AGE_RANGE: (u32, u32) = (0, 120);
/// Inclusive range accepted for `bmi`.
pub const BMI_RANGE: (f32, f32) = (0.0, 100.0);
/// Inclusive range accepted for `children`.
pub const CHILDREN_RANGE: (u32, u32) = (0, 20);

/// Match `label` (trimmed, case-insensitive) against a category's accepted
/// spellings.
fn match_label<T: Copy>(field: &'static str, label: &str, table: &[(&str, T)]) -> Result<T> {
    let needle = label.trim();
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(needle))
        .map(|(_, value)| *value)
        .ok_or_else(|| MedcostError::UnrecognizedCategory {
            field,
            value: label.to_string(),
        })
}

/// Sex of the insured person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Sex {
    /// Male
    Male,
    /// Female
    Female,
}

impl Sex {
    const LABELS: &'static [(&'static str, Sex)] = &[
        ("male", Sex::Male),
        ("female", Sex::Female),
        ("男性", Sex::Male),
        ("女性", Sex::Female),
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

/// Smoking status of the insured person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Smoker {
    /// Smokes
    Yes,
    /// Does not smoke
    No,
}

impl Smoker {
    const LABELS: &'static [(&'static str, Smoker)] = &[
        ("yes", Smoker::Yes),
        ("no", Smoker::No),
        ("是", Smoker::Yes),
        ("否", Smoker::No),
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Smoker::Yes => "yes",
            Smoker::No => "no",
        }
    }
}

/// Residential region of the insured person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Region {
    /// Northeast
    Northeast,
    /// Southeast
    Southeast,
    /// Northwest
    Northwest,
    /// Southwest
    Southwest,
}

impl Region {
    const LABELS: &'static [(&'static str, Region)] = &[
        ("northeast", Region::Northeast),
        ("southeast", Region::Southeast),
        ("northwest", Region::Northwest),
        ("southwest", Region::Southwest),
        ("东北部", Region::Northeast),
        ("东南部", Region::Southeast),
        ("西北部", Region::Northwest),
        ("西南部", Region::Southwest),
    ];

    /// All regions, in feature-vector order.
    pub const ALL: [Region; 4] = [
        Region::Northeast,
        Region::Southeast,
        Region::Northwest,
        Region::Southwest,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Region::Northeast => "northeast",
            Region::Southeast => "southeast",
            Region::Northwest => "northwest",
            Region::Southwest => "southwest",
        }
    }
}

macro_rules! label_conversions {
    ($ty:ident, $field:literal) => {
        impl FromStr for $ty {
            type Err = MedcostError;

            fn from_str(s: &str) -> Result<Self> {
                match_label($field, s, Self::LABELS)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = MedcostError;

            fn try_from(s: String) -> Result<Self> {
                s.parse()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_conversions!(Sex, "sex");
label_conversions!(Smoker, "smoker");
label_conversions!(Region, "region");

/// Attributes submitted for one prediction request.
///
/// # Examples
///
/// ```
/// use medcost::input::{RawInput, Region, Sex, Smoker};
///
/// let raw = RawInput::from_labels(30, 25.5, 1, "male", "no", "southeast").unwrap();
/// assert_eq!(raw.sex, Sex::Male);
/// assert_eq!(raw.smoker, Smoker::No);
/// assert_eq!(raw.region, Region::Southeast);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    /// Age in years
    pub age: u32,
    /// Body mass index
    pub bmi: f32,
    /// Number of dependent children
    pub children: u32,
    /// Sex
    pub sex: Sex,
    /// Smoking status
    pub smoker: Smoker,
    /// Residential region
    pub region: Region,
}

impl RawInput {
    /// Creates an input from already-typed values.
    #[must_use]
    pub const fn new(
        age: u32,
        bmi: f32,
        children: u32,
        sex: Sex,
        smoker: Smoker,
        region: Region,
    ) -> Self {
        Self {
            age,
            bmi,
            children,
            sex,
            smoker,
            region,
        }
    }

    /// Creates an input from form labels.
    ///
    /// # Errors
    ///
    /// Returns [`MedcostError::UnrecognizedCategory`] for the first label
    /// that matches no known category.
    pub fn from_labels(
        age: u32,
        bmi: f32,
        children: u32,
        sex: &str,
        smoker: &str,
        region: &str,
    ) -> Result<Self> {
        Ok(Self {
            age,
            bmi,
            children,
            sex: sex.parse()?,
            smoker: smoker.parse()?,
            region: region.parse()?,
        })
    }

    /// Checks numeric fields against the ranges the input form enforces.
    ///
    /// The encoder never calls this; it is for collaborators that accept
    /// values from outside a constrained form.
    ///
    /// # Errors
    ///
    /// Returns [`MedcostError::OutOfRange`] for the first offending field.
    pub fn validate(&self) -> Result<()> {
        check_range("age", f64::from(self.age), AGE_RANGE.0.into(), AGE_RANGE.1.into())?;
        // NaN fails both comparisons, so test containment rather than exclusion.
        if !(BMI_RANGE.0..=BMI_RANGE.1).contains(&self.bmi) {
            return Err(MedcostError::OutOfRange {
                field: "bmi",
                value: f64::from(self.bmi),
                min: BMI_RANGE.0.into(),
                max: BMI_RANGE.1.into(),
            });
        }
        check_range(
            "children",
            f64::from(self.children),
            CHILDREN_RANGE.0.into(),
            CHILDREN_RANGE.1.into(),
        )
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value < min || value > max {
        return Err(MedcostError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_english_labels_case_insensitive() {
        assert_eq!("Male".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("FEMALE".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!(" yes ".parse::<Smoker>().unwrap(), Smoker::Yes);
        assert_eq!("No".parse::<Smoker>().unwrap(), Smoker::No);
        assert_eq!("SouthWest".parse::<Region>().unwrap(), Region::Southwest);
    }

    #[test]
    fn test_parse_form_labels() {
        assert_eq!("女性".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("否".parse::<Smoker>().unwrap(), Smoker::No);
        assert_eq!("西北部".parse::<Region>().unwrap(), Region::Northwest);
        assert_eq!("东南部".parse::<Region>().unwrap(), Region::Southeast);
    }

    #[test]
    fn test_unknown_region_is_unrecognized_category() {
        let err = "midwest".parse::<Region>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedCategory);
        match err {
            MedcostError::UnrecognizedCategory { field, value } => {
                assert_eq!(field, "region");
                assert_eq!(value, "midwest");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_labels_reports_first_bad_field() {
        let err = RawInput::from_labels(40, 30.0, 2, "male", "sometimes", "mars").unwrap_err();
        assert!(matches!(
            err,
            MedcostError::UnrecognizedCategory { field: "smoker", .. }
        ));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for region in Region::ALL {
            assert_eq!(region.to_string().parse::<Region>().unwrap(), region);
        }
    }

    #[test]
    fn test_deserialize_rejects_unknown_label() {
        let ok: RawInput = serde_json::from_str(
            r#"{"age":30,"bmi":25.5,"children":1,"sex":"male","smoker":"no","region":"southeast"}"#,
        )
        .unwrap();
        assert_eq!(ok.region, Region::Southeast);

        let bad = serde_json::from_str::<RawInput>(
            r#"{"age":30,"bmi":25.5,"children":1,"sex":"male","smoker":"no","region":"atlantis"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_serialize_uses_lowercase_names() {
        let raw = RawInput::new(30, 25.5, 1, Sex::Female, Smoker::Yes, Region::Northeast);
        let json = serde_json::to_string(&raw).unwrap();
        assert!(json.contains(r#""sex":"female""#));
        assert!(json.contains(r#""smoker":"yes""#));
        assert!(json.contains(r#""region":"northeast""#));
    }

    #[test]
    fn test_validate_accepts_bounds() {
        for (age, bmi, children) in [(0, 0.0, 0), (120, 100.0, 20)] {
            let raw = RawInput::new(age, bmi, children, Sex::Male, Smoker::No, Region::Southwest);
            assert!(raw.validate().is_ok());
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let raw = RawInput::new(121, 20.0, 0, Sex::Male, Smoker::No, Region::Southwest);
        assert!(matches!(
            raw.validate(),
            Err(MedcostError::OutOfRange { field: "age", .. })
        ));

        let raw = RawInput::new(30, f32::NAN, 0, Sex::Male, Smoker::No, Region::Southwest);
        assert!(matches!(
            raw.validate(),
            Err(MedcostError::OutOfRange { field: "bmi", .. })
        ));

        let raw = RawInput::new(30, 20.0, 21, Sex::Male, Smoker::No, Region::Southwest);
        assert!(matches!(
            raw.validate(),
            Err(MedcostError::OutOfRange {
                field: "children",
                ..
            })
        ));
    }
}
