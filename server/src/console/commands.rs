use crate::auth::session_service::SessionService;
use crate::console::registry::CommandRegistry;
use crate::error::AuthError;
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid user ID format: {0}")]
    InvalidUserId(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Stop,
}

#[derive(Debug)]
pub struct CommandOutput {
    pub lines: Vec<String>,
    pub outcome: CommandOutcome,
}

impl CommandOutput {
    pub fn lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            outcome: CommandOutcome::Continue,
        }
    }

    pub fn stop(line: &str) -> Self {
        Self {
            lines: vec![line.to_string()],
            outcome: CommandOutcome::Stop,
        }
    }
}

pub struct CommandContext<'a> {
    pub session_service: &'a SessionService,
    pub registry: &'a CommandRegistry,
}

#[async_trait]
pub trait ConsoleCommand: Send + Sync {
    fn usage(&self) -> &'static str;
    async fn execute(
        &self,
        context: &CommandContext<'_>,
        args: &[&str],
    ) -> Result<CommandOutput, ConsoleError>;
}

pub struct HelpCommand;
pub struct StopCommand;
pub struct ResetCommand;
pub struct ListUsersCommand;
pub struct DeleteUserCommand;

#[async_trait]
impl ConsoleCommand for HelpCommand {
    fn usage(&self) -> &'static str {
        "help"
    }

    async fn execute(
        &self,
        context: &CommandContext<'_>,
        _args: &[&str],
    ) -> Result<CommandOutput, ConsoleError> {
        let mut lines = vec!["Available commands:".to_string()];
        lines.extend(
            context
                .registry
                .usages()
                .map(|usage| format!(" - {usage}")),
        );
        Ok(CommandOutput::lines(lines))
    }
}

#[async_trait]
impl ConsoleCommand for StopCommand {
    fn usage(&self) -> &'static str {
        "stop"
    }

    async fn execute(
        &self,
        _context: &CommandContext<'_>,
        _args: &[&str],
    ) -> Result<CommandOutput, ConsoleError> {
        info!("Received stop command via console.");
        Ok(CommandOutput::stop("Stopping application..."))
    }
}

#[async_trait]
impl ConsoleCommand for ResetCommand {
    fn usage(&self) -> &'static str {
        "reset"
    }

    async fn execute(
        &self,
        context: &CommandContext<'_>,
        _args: &[&str],
    ) -> Result<CommandOutput, ConsoleError> {
        info!("Received reset command via console.");
        let admin = context.session_service.admin_reset().await?;
        Ok(CommandOutput::lines(vec![format!(
            "All users have been reset, default admin: {} with ID: {}.",
            admin.email, admin.id
        )]))
    }
}

#[async_trait]
impl ConsoleCommand for ListUsersCommand {
    fn usage(&self) -> &'static str {
        "list_users"
    }

    async fn execute(
        &self,
        context: &CommandContext<'_>,
        _args: &[&str],
    ) -> Result<CommandOutput, ConsoleError> {
        let users = context.session_service.get_users().await?;
        let mut lines = vec![format!("Users ({}):", users.len())];
        lines.extend(users.iter().map(|user| {
            format!(
                " - ID: {}, Email: {}, Username: {}, Admin: {}, CreatedAt: {}",
                user.id, user.email, user.username, user.is_admin, user.created_at
            )
        }));
        Ok(CommandOutput::lines(lines))
    }
}

#[async_trait]
impl ConsoleCommand for DeleteUserCommand {
    fn usage(&self) -> &'static str {
        "delete_user <user_id>"
    }

    async fn execute(
        &self,
        context: &CommandContext<'_>,
        args: &[&str],
    ) -> Result<CommandOutput, ConsoleError> {
        let [user_id] = args else {
            return Err(ConsoleError::Usage(self.usage()));
        };

        let user_id =
            Uuid::parse_str(user_id).map_err(|_| ConsoleError::InvalidUserId(user_id.to_string()))?;
        info!("Received delete_user command via console for user with ID: {user_id}.");
        let user = context.session_service.delete_user(user_id).await?;
        Ok(CommandOutput::lines(vec![format!(
            "Deleted user: {} with ID: {}.",
            user.email, user.id
        )]))
    }
}
