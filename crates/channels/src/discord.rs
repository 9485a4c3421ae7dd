//! Discord adapter built on serenity.
//!
//! Slash commands are registered from the command catalog when the gateway
//! reports ready. Each interaction is deferred, dispatched through the
//! [`CommandRouter`], and answered by editing the deferred response with an
//! embed (plus a file when the reply carries one).

use brandbot_agent::commands::{OptionKind, OptionSpec, all_specs};
use brandbot_agent::response::display_name;
use brandbot_agent::{Args, CommandRouter, Invocation, Reply};
use brandbot_config::DiscordConfig;
use brandbot_core::brand::ERROR_COLOR;
use brandbot_core::error::{CommandError, ErrorKind, KnowledgeError};
use brandbot_knowledge::document::MAX_UPLOAD_BYTES;
use serenity::all::{
    ActivityData, Client, Command, CommandDataOption, CommandDataOptionValue, CommandInteraction,
    CommandOptionType, Context, CreateAttachment, CreateCommand, CreateCommandOption, CreateEmbed,
    CreateEmbedFooter, EditInteractionResponse, EventHandler, GatewayIntents, GuildId, Interaction,
    Ready,
};
use serenity::async_trait;
use tracing::{error, info, warn};

pub struct DiscordBot {
    router: CommandRouter,
    guild_id: Option<u64>,
    status_text: String,
}

impl DiscordBot {
    pub fn new(router: CommandRouter, config: &DiscordConfig) -> Self {
        Self {
            router,
            guild_id: config.guild_id,
            status_text: config.status_text.clone(),
        }
    }

    async fn handle_command(&self, ctx: &Context, command: &CommandInteraction) {
        let name = command.data.name.clone();
        info!(command = %name, user = %command.user.name, "Slash command received");

        if let Err(e) = command.defer(&ctx.http).await {
            error!(command = %name, error = %e, "Failed to defer interaction");
            return;
        }

        let reply = match self.invocation(command).await {
            Ok(invocation) => self.router.dispatch(invocation).await,
            Err(e) => Err(e),
        };
        let reply = reply.unwrap_or_else(|e| {
            warn!(command = %name, kind = ?e.kind(), error = %e, "Command failed");
            error_reply(&name, &e)
        });

        if let Err(e) = command.edit_response(&ctx.http, edit_for(&reply)).await {
            error!(command = %name, error = %e, "Failed to send response");
        }
    }

    /// Turn the interaction's options into a surface-neutral invocation,
    /// downloading the attachment when there is one.
    async fn invocation(&self, command: &CommandInteraction) -> Result<Invocation, CommandError> {
        let mut invocation = Invocation::new(&command.data.name, args_from(&command.data.options));

        let attachment = command.data.options.iter().find_map(|o| match &o.value {
            CommandDataOptionValue::Attachment(id) => command.data.resolved.attachments.get(id),
            _ => None,
        });

        if let Some(file) = attachment {
            if file.size as usize > MAX_UPLOAD_BYTES {
                return Err(CommandError::Unsupported(format!(
                    "'{}' is larger than {} MB",
                    file.filename,
                    MAX_UPLOAD_BYTES / (1024 * 1024)
                )));
            }
            let bytes = file.download().await.map_err(|e| {
                CommandError::Knowledge(KnowledgeError::Fetch {
                    url: file.url.clone(),
                    reason: e.to_string(),
                })
            })?;
            invocation = invocation.with_upload(file.filename.clone(), bytes);
        }
        Ok(invocation)
    }
}

#[async_trait]
impl EventHandler for DiscordBot {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "Discord bot connected");
        ctx.set_activity(Some(ActivityData::watching(&self.status_text)));

        let commands = create_commands();
        let count = commands.len();
        let result = match self.guild_id {
            Some(id) => GuildId::new(id).set_commands(&ctx.http, commands).await,
            None => Command::set_global_commands(&ctx.http, commands).await,
        };

        match result {
            Ok(_) => info!(count, guild = ?self.guild_id, "Slash commands registered"),
            Err(e) => error!(error = %e, "Failed to register slash commands"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.handle_command(&ctx, &command).await;
        }
    }
}

/// Connect to the gateway and serve until the client stops.
pub async fn run(
    router: CommandRouter,
    token: &str,
    config: &DiscordConfig,
) -> Result<(), serenity::Error> {
    let handler = DiscordBot::new(router, config);
    let mut client = Client::builder(token, GatewayIntents::GUILDS)
        .event_handler(handler)
        .await?;

    info!("Starting Discord client");
    client.start().await
}

/// Slash command definitions for every catalog entry.
pub fn create_commands() -> Vec<CreateCommand> {
    all_specs()
        .iter()
        .map(|spec| {
            spec.options.iter().fold(
                CreateCommand::new(spec.name).description(spec.description),
                |cmd, option| cmd.add_option(create_option(option)),
            )
        })
        .collect()
}

fn create_option(option: &OptionSpec) -> CreateCommandOption {
    let kind = match option.kind {
        OptionKind::String => CommandOptionType::String,
        OptionKind::Integer => CommandOptionType::Integer,
        OptionKind::Attachment => CommandOptionType::Attachment,
    };
    CreateCommandOption::new(kind, option.name, option.description).required(option.required)
}

/// Option values as text. Attachments are handled separately.
fn args_from(options: &[CommandDataOption]) -> Args {
    let mut args = Args::new();
    for option in options {
        let value = match &option.value {
            CommandDataOptionValue::String(s) => s.clone(),
            CommandDataOptionValue::Integer(i) => i.to_string(),
            CommandDataOptionValue::Number(n) => n.to_string(),
            CommandDataOptionValue::Boolean(b) => b.to_string(),
            _ => continue,
        };
        args.insert(option.name.clone(), value);
    }
    args
}

pub fn error_reply(command: &str, err: &CommandError) -> Reply {
    let hint = match err.kind() {
        ErrorKind::Unconfigured => "The bot is missing an API key. Ask an administrator to check its configuration.",
        ErrorKind::ProviderFailure => "Every AI provider failed. Please try again in a moment.",
        ErrorKind::Unsupported => "That input is not supported.",
        ErrorKind::InvalidInput => "Check the command options with /help.",
        ErrorKind::Internal => "Something went wrong on our side.",
    };
    Reply::new(format!("❌ {} Failed", display_name(command)), ERROR_COLOR)
        .description(err.to_string())
        .footer(hint)
}

pub fn embed_for(reply: &Reply) -> CreateEmbed {
    let mut embed = CreateEmbed::new().title(&reply.title).colour(reply.color);
    if let Some(description) = &reply.description {
        embed = embed.description(description);
    }
    for field in &reply.fields {
        embed = embed.field(&field.name, &field.value, field.inline);
    }
    if let Some(url) = &reply.image_url {
        embed = embed.image(url);
    }
    if let Some(footer) = &reply.footer {
        embed = embed.footer(CreateEmbedFooter::new(footer));
    }
    embed
}

fn edit_for(reply: &Reply) -> EditInteractionResponse {
    let edit = EditInteractionResponse::new().embed(embed_for(reply));
    match &reply.attachment {
        Some(file) => edit.new_attachment(CreateAttachment::bytes(
            file.content.as_bytes().to_vec(),
            file.filename.clone(),
        )),
        None => edit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandbot_core::error::ResolveError;

    #[test]
    fn every_catalog_command_is_registered() {
        let commands = create_commands();
        assert_eq!(commands.len(), all_specs().len());

        let json = serde_json::to_value(&commands).unwrap();
        let upload = json
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["name"] == "upload_doc")
            .unwrap();
        // 11 is Discord's attachment option type
        assert_eq!(upload["options"][0]["type"], 11);
        assert_eq!(upload["options"][0]["required"], true);
    }

    #[test]
    fn error_reply_is_red_with_command_name() {
        let reply = error_reply("case_study", &CommandError::from(ResolveError::Unconfigured));
        assert_eq!(reply.title, "❌ Case Study Failed");
        assert_eq!(reply.color, 0xff0000);
        assert!(reply.description.unwrap().contains("No AI provider is configured"));
    }

    #[test]
    fn embed_carries_every_field() {
        let reply = Reply::new("Title", 0x123456)
            .description("desc")
            .field("A", "one", 1024)
            .field("B", "two", 1024)
            .footer("foot");
        let json = serde_json::to_value(embed_for(&reply)).unwrap();

        assert_eq!(json["title"], "Title");
        assert_eq!(json["color"], 0x123456);
        assert_eq!(json["fields"].as_array().unwrap().len(), 2);
        assert_eq!(json["footer"]["text"], "foot");
    }
}
