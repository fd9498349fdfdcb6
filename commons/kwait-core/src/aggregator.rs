use crate::status::ResourceStatus;

/// Fold many resource statuses into one.
///
/// The result is `target` only when every status equals `target` (so an
/// empty set is vacuously at the target). Otherwise it is the most severe
/// status that differs from `target`, see [`ResourceStatus::severity`].
pub fn aggregate<I>(statuses: I, target: ResourceStatus) -> ResourceStatus
where
    I: IntoIterator<Item = ResourceStatus>,
{
    statuses
        .into_iter()
        .filter(|s| *s != target)
        .max_by_key(|s| s.severity())
        .unwrap_or(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ResourceStatus::*;

    #[test]
    fn empty_set_is_vacuously_at_target() {
        assert_eq!(aggregate(Vec::<ResourceStatus>::new(), Current), Current);
    }

    #[test]
    fn all_at_target_yields_target() {
        assert_eq!(aggregate([Current, Current, Current], Current), Current);
    }

    #[test]
    fn surfaces_most_severe_non_target_status() {
        assert_eq!(aggregate([Current, InProgress], Current), InProgress);
        assert_eq!(aggregate([InProgress, NotFound], Current), NotFound);
        assert_eq!(aggregate([NotFound, Unknown, Current], Current), Unknown);
        assert_eq!(aggregate([Unknown, Terminating], Current), Terminating);
        assert_eq!(
            aggregate([Terminating, Failed, InProgress], Current),
            Failed
        );
    }

    #[test]
    fn order_of_inputs_does_not_matter() {
        let statuses = [Current, InProgress, NotFound, Current, Unknown];
        let expected = aggregate(statuses, Current);
        let mut reversed = statuses;
        reversed.reverse();
        assert_eq!(aggregate(reversed, Current), expected);
        let mut rotated = statuses;
        rotated.rotate_left(2);
        assert_eq!(aggregate(rotated, Current), expected);
        // Repeated evaluation is stable.
        assert_eq!(aggregate(statuses, Current), expected);
    }

    #[test]
    fn other_targets_treat_current_as_non_target() {
        assert_eq!(aggregate([NotFound, NotFound], NotFound), NotFound);
        assert_eq!(aggregate([NotFound, Current], NotFound), Current);
        assert_eq!(aggregate([Current, Terminating], NotFound), Terminating);
    }
}
