//! Binary crate for the Telegram weather bot.
//!
//! This crate focuses on:
//! - Wiring the interaction flow into teloxide's dialogue machinery
//! - Translating flow replies into messages, keyboards and photos

use teloxide::{
    dispatching::dialogue::InMemStorage,
    prelude::*,
    types::InputFile,
    utils::command::BotCommands,
};
use tracing_subscriber::EnvFilter;
use weather_core::{
    Config,
    flow::{Flow, Input, InteractionState, Reply, Report},
};

mod keyboard;

type WeatherDialogue = Dialogue<InteractionState, InMemStorage<InteractionState>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
enum Command {
    /// Greet the user and show the menu.
    Start,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    let bot = Bot::new(config.require_telegram_token()?);
    let flow = Flow::from_config(&config)?;

    tracing::info!("starting weather bot");

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<InteractionState>, InteractionState>()
            .branch(dptree::entry().filter_command::<Command>().endpoint(start))
            .endpoint(on_message),
    )
    .dependencies(dptree::deps![InMemStorage::<InteractionState>::new(), flow])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

    Ok(())
}

async fn start(bot: Bot, dialogue: WeatherDialogue, msg: Message) -> HandlerResult {
    dialogue.update(InteractionState::Idle).await?;

    let name = msg.chat.first_name().unwrap_or("there");
    bot.send_message(
        msg.chat.id,
        format!(
            "Hi {name} ✋ !\nI'm weather bot! 🔆\n\
             Please select what information you want to receive ⬇"
        ),
    )
    .reply_markup(keyboard::main_menu())
    .await?;

    Ok(())
}

async fn on_message(bot: Bot, dialogue: WeatherDialogue, flow: Flow, msg: Message) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let input = match text {
        keyboard::CURRENT_WEATHER => Input::Select(Report::Current),
        keyboard::WEATHER_HISTORY => Input::Select(Report::History),
        other => Input::Text(other),
    };

    let state = dialogue.get().await?.unwrap_or_default();
    let (next, reply) = flow.step(state, input).await;
    dialogue.update(next).await?;

    send_reply(&bot, msg.chat.id, reply).await
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> HandlerResult {
    match reply {
        Reply::Menu => {
            bot.send_message(chat_id, "Please select what information you want to receive ⬇")
                .reply_markup(keyboard::main_menu())
                .await?;
        }
        Reply::AskCity => {
            bot.send_message(chat_id, "Please write city name:")
                .reply_markup(teloxide::types::ReplyMarkup::kb_remove())
                .await?;
        }
        Reply::Current(report) => {
            bot.send_message(chat_id, report.message())
                .reply_markup(keyboard::main_menu())
                .await?;
        }
        Reply::Chart { png, caption } => {
            bot.send_photo(chat_id, InputFile::memory(png).file_name("weather.png"))
                .caption(caption)
                .reply_markup(keyboard::main_menu())
                .await?;
        }
        Reply::Error(text) => {
            bot.send_message(chat_id, text)
                .reply_markup(keyboard::main_menu())
                .await?;
        }
    }

    Ok(())
}
