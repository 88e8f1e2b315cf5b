//! Group resolution.

use constraints_core::Group;

/// Decides whether a constraint takes part in a validation call.
///
/// An empty requested set behaves as `{DEFAULT}`, and so does a constraint
/// declared without groups. A constraint is active when the two sets share
/// at least one group. Naming a non-default group does not pull in
/// default-group constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupResolver;

impl GroupResolver {
    /// Returns true if a constraint declared with `declared` is active for a
    /// call requesting `requested`.
    pub fn is_active(declared: &[Group], requested: &[Group]) -> bool {
        let default = [Group::DEFAULT];
        let declared = if declared.is_empty() {
            &default[..]
        } else {
            declared
        };
        let requested = if requested.is_empty() {
            &default[..]
        } else {
            requested
        };
        declared.iter().any(|group| requested.contains(group))
    }
}
