//! Local sign-in state.

use anyhow::Result;
use playrent_commerce::ids::UserId;
use playrent_commerce::user::{Role, UserProfile};

use super::{SessionArgs, SessionCommand};
use crate::context::Context;

/// Run the session command.
pub async fn run(args: SessionArgs, ctx: &Context) -> Result<()> {
    let state = ctx.connect()?;

    match args.command {
        SessionCommand::Login {
            id,
            name,
            email,
            admin,
        } => {
            let user = UserProfile {
                id: UserId::new(id),
                display_name: name,
                email,
                role: if admin { Role::Admin } else { Role::Customer },
            };
            state.sign_in(user.clone())?;
            ctx.output
                .success(&format!("Signed in as {} ({})", user.display_name, user.role.as_str()));
            if ctx.config.api.token.is_none() {
                ctx.output
                    .warn("No api.token configured; the server will treat requests as signed out");
            }
        }
        SessionCommand::Show => match state.current_user()? {
            Some(user) if ctx.output.is_json() => ctx.output.json(&user),
            Some(user) => {
                ctx.output.header(&user.display_name);
                ctx.output.kv("id", user.id.as_str());
                ctx.output.kv("email", &user.email);
                ctx.output.kv("role", user.role.as_str());
            }
            None if ctx.output.is_json() => ctx.output.json(&serde_json::Value::Null),
            None => ctx.output.info("Not signed in"),
        },
        SessionCommand::Logout => {
            state.sign_out()?;
            ctx.output.success("Signed out");
        }
    }
    Ok(())
}
