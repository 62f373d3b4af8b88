use jobetl_model::{CanonicalRecord, DropReason, Field};

/// Mark `record` invalid for every required field that has no sentinel member
/// and still holds it.
///
/// The other required fields keep `__NA__`. A posted date already rejected as
/// unparseable is not reported twice.
pub fn check_required(record: &mut CanonicalRecord) {
    let unparseable_date = record
        .flags
        .invalid
        .iter()
        .any(|reason| matches!(reason, DropReason::UnparseableDate { .. }));

    for &field in Field::REQUIRED {
        if !field.drops_record_when_missing() || !record.is_na(field) {
            continue;
        }
        if field == Field::PostedDate && unparseable_date {
            continue;
        }
        record.flags.mark_invalid(DropReason::MissingRequired { field });
    }
}

#[cfg(test)]
mod tests {
    use jobetl_model::{RecordId, SourceRef};

    use super::*;

    fn record() -> CanonicalRecord {
        CanonicalRecord::new(
            SourceRef::new("indeed", 3),
            RecordId::from_first_16_bytes_of_sha256([0; 32]),
        )
    }

    #[test]
    fn only_posted_date_drops_the_record() {
        let mut record = record();
        check_required(&mut record);

        let reasons: Vec<String> = record.flags.invalid.iter().map(ToString::to_string).collect();
        assert_eq!(reasons, ["missing required posted_date"]);
        assert!(record.is_na(Field::EducationLevel));
        assert!(record.is_na(Field::RemoteOption));
    }

    #[test]
    fn unparseable_date_is_not_reported_twice() {
        let mut record = record();
        record.flags.mark_invalid(DropReason::UnparseableDate {
            raw: "soon".to_string(),
        });
        check_required(&mut record);

        let reasons: Vec<String> = record.flags.invalid.iter().map(ToString::to_string).collect();
        assert_eq!(reasons, ["unparseable posted_date 'soon'"]);
    }
}
