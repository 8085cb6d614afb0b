//! Role-based permission checks

use shared::models::Role;

/// Whether the acting user may modify `target_user_id`'s order data.
///
/// Users always act on their own data; organisers and co-hosts act on
/// anyone's. The decision uses the *acting* user's role, never the target's.
pub fn can_act_on_behalf_of(
    acting_role: Option<Role>,
    acting_user_id: i64,
    target_user_id: i64,
) -> bool {
    acting_user_id == target_user_id || acting_role.is_some_and(|r| r.can_manage())
}
