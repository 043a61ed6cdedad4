use super::types::Contact;

/// A contact is fresh while its age is strictly below the threshold.
/// Ages are compared as reported, without clamping.
pub fn is_fresh(contact: &Contact, threshold_s: f64) -> bool {
    contact.last_seen < threshold_s
}
