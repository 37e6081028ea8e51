use crate::{api::Api, users::BuiltinUser};
use tracing::info;

/// Upserts users declared as `|`-separated `client_id:client_secret:name:type` entries.
pub async fn builtin_users_initializer<BU: AsRef<str>>(
    api: &Api,
    builtin_users: BU,
) -> anyhow::Result<()> {
    info!("Initializing builtin users.");
    let users = api.users();

    let mut initialized_builtin_users = 0;
    for builtin_user_str in builtin_users
        .as_ref()
        .split('|')
        .filter(|entry| !entry.trim().is_empty())
    {
        let user = users
            .upsert_builtin(BuiltinUser::try_from(builtin_user_str)?)
            .await?;
        info!(user.id = %user.id, "Initialized builtin {} user.", user.user_type.as_str());
        initialized_builtin_users += 1;
    }

    info!("Successfully initialized {initialized_builtin_users} builtin users.");

    Ok(())
}
