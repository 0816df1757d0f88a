//! Command handlers for the Telegram bot.

use std::sync::{Arc, OnceLock};

use chrono::Local;
use eduhub_core::menu::exams_page;
use eduhub_core::quiz::{format_pyq, format_quote, pick_indexed, pick_random, pyq_plain_parts};
use eduhub_core::render::{render_logo, render_quiz_card, LogoStyle};
use eduhub_core::text::truncate_chars;
use eduhub_core::{html_escape, parse_shortcut, PyqQuestion, QuizPoll, QuizShortcut, Quote};
use eduhub_persistence::KnownChat;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use regex::Regex;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, InputFile, ParseMode, PollType};
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info, warn};

use crate::admin::{handle_broadcast, handle_reply, handle_users};
use crate::callbacks::{menu_keyboard, EXAMS_UNAVAILABLE};
use crate::moderation::{handle_moderation, ModAction};
use crate::state::BotState;

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Welcome message and usage guide")]
    Start,

    #[command(description = "Show this help")]
    Help,

    #[command(description = "About Eduhub")]
    About,

    #[command(description = "Browse exams and play a paper")]
    Quiz,

    #[command(description = "Random previous-year question, or /pyq <n> for n quiz polls")]
    Pyq(String),

    #[command(description = "Random previous-year question as an image")]
    Quizimg,

    #[command(description = "Motivational quote")]
    Quote,

    #[command(description = "Generate a logo: /gen <name>")]
    Gen(String),

    #[command(description = "Show your Telegram details")]
    Me,

    #[command(description = "Reply to a message to turn it into JavaScript")]
    Java,

    #[command(description = "Same as /java")]
    Script,

    #[command(description = "Ban a user (reply or user id)")]
    Ban(String),

    #[command(description = "Unban a user (reply or user id)")]
    Unban(String),

    #[command(description = "Mute a user (reply or user id)")]
    Mute(String),

    #[command(description = "Unmute a user (reply or user id)")]
    Unmute(String),

    #[command(description = "Warn a user; three warnings mute them")]
    Warn(String),

    #[command(description = "Show a user's warnings")]
    Warns(String),

    #[command(description = "Clear a user's warnings")]
    Resetwarns(String),

    #[command(description = "Bot admin: message every known chat")]
    Broadcast(String),

    #[command(description = "Bot admin: /reply <chat_id> <message>")]
    Reply(String),

    #[command(description = "Bot admin: list known chats")]
    Users,
}

const SHORTCUT_HELP: &str = "\n\nQuiz shortcuts:\n\
    /b1, /c2, /p3 - question n of biology, chemistry or physics\n\
    /pyqb 5, /pyqc 5, /pyqp 5 - n random quiz polls of a subject (max 10)";

const FETCH_FAILED: &str = "⚠️ Failed to fetch questions. Try again later.";
const NO_QUESTIONS: &str = "❌ No questions found.";

/// Register the message's chat in the known-chat registry.
pub async fn remember_chat(state: &BotState, msg: &Message) {
    let chat = &msg.chat;
    let name = chat
        .title()
        .or_else(|| chat.first_name())
        .map(str::to_string);
    state
        .register_chat(KnownChat::new(chat.id.0, chat.username().map(str::to_string), name))
        .await;
}

fn display_name(msg: &Message) -> String {
    msg.from
        .as_ref()
        .map(|u| u.full_name())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "there".to_string())
}

/// First line of the /start reply.
pub fn welcome_text(name: &str, date: &str) -> String {
    format!(
        "Dear {}, today is {}, welcome to <b>Eduhub Bot {}</b>! 📚\n\
        Your smart companion for NEET &amp; JEE prep.",
        html_escape(name),
        html_escape(date),
        env!("CARGO_PKG_VERSION")
    )
}

const USAGE_GUIDE: &str = "<b>Quiz practice</b>\n\
    → /quiz - pick an exam and a paper to play\n\
    → /b1, /c2, /p3 - question 1 of biology, 2 of chemistry, 3 of physics\n\
    → /pyqb 5, /pyqc 5, /pyqp 5 - 5 random quiz polls of a subject\n\
    → /pyq - a random previous-year question, /pyq 5 - 5 random polls\n\n\
    <b>More</b>\n\
    → /quizimg - a previous-year question as an image\n\
    → /quote - a motivational quote\n\
    → /gen &lt;name&gt; - a logo for your name\n\
    → /me - your Telegram details\n\
    → /help - all commands";

/// Handle the /start command.
pub async fn handle_start(bot: Bot, msg: Message) -> ResponseResult<()> {
    let today = Local::now().format("%-d %B %Y").to_string();

    bot.send_message(msg.chat.id, welcome_text(&display_name(&msg), &today))
        .parse_mode(ParseMode::Html)
        .await?;
    bot.send_message(msg.chat.id, USAGE_GUIDE)
        .parse_mode(ParseMode::Html)
        .await?;

    info!(chat_id = %msg.chat.id, user = ?msg.from.as_ref().map(|u| &u.username), "User started bot");
    Ok(())
}

/// Handle the /help command.
pub async fn handle_help(bot: Bot, msg: Message) -> ResponseResult<()> {
    let help_text = format!("{}{}", Command::descriptions(), SHORTCUT_HELP);
    bot.send_message(msg.chat.id, help_text).await?;
    Ok(())
}

/// Handle the /about command.
pub async fn handle_about(bot: Bot, msg: Message) -> ResponseResult<()> {
    let about = format!(
        "<b>Eduhub Bot {}</b>\n\n\
        Practice for NEET and JEE from Telegram: full papers, previous-year \
        questions, subject-wise quiz polls and daily motivation.\n\n\
        Send /start for a quick guide.",
        env!("CARGO_PKG_VERSION")
    );
    bot.send_message(msg.chat.id, about)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Handle the /quiz command - show the first page of exams.
pub async fn handle_quiz(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let exams = match state.catalog().load().await {
        Ok(exams) => exams,
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "Failed to load exams");
            bot.send_message(msg.chat.id, EXAMS_UNAVAILABLE).await?;
            return Ok(());
        }
    };

    let page = exams_page(&exams, 0);
    bot.send_message(msg.chat.id, page.text.clone())
        .parse_mode(ParseMode::Html)
        .reply_markup(menu_keyboard(&page))
        .await?;
    Ok(())
}

fn random_pyq(questions: &[PyqQuestion]) -> Option<&PyqQuestion> {
    questions.choose(&mut rand::thread_rng())
}

/// Handle the /pyq command.
pub async fn handle_pyq(bot: Bot, msg: Message, state: Arc<BotState>, arg: String) -> ResponseResult<()> {
    let arg = arg.trim();
    if !arg.is_empty() {
        return match parse_shortcut(&format!("/pyq {arg}")) {
            Some(shortcut) => handle_shortcut(bot, msg, state, shortcut).await,
            None => {
                bot.send_message(msg.chat.id, "Usage: /pyq or /pyq <number of questions>")
                    .await?;
                Ok(())
            }
        };
    }

    let questions = match state.pyq_questions().await {
        Ok(questions) => questions,
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "Failed to fetch PYQ");
            bot.send_message(msg.chat.id, "⚠️ Failed to fetch PYQ. Try again later.")
                .await?;
            return Ok(());
        }
    };

    let Some(text) = random_pyq(&questions).map(format_pyq) else {
        bot.send_message(msg.chat.id, NO_QUESTIONS).await?;
        return Ok(());
    };

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Title drawn in the header band of a quiz card.
fn card_title(q: &PyqQuestion) -> String {
    let subject = q.subject.trim();
    if subject.is_empty() {
        "PYQ Practice".to_string()
    } else {
        format!("PYQ · {}", subject.to_uppercase())
    }
}

/// Handle the /quizimg command - a random PYQ drawn on a card.
pub async fn handle_quizimg(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let questions = match state.pyq_questions().await {
        Ok(questions) => questions,
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "Failed to fetch PYQ for image");
            bot.send_message(msg.chat.id, "❌ Error fetching quiz.").await?;
            return Ok(());
        }
    };
    let Some(question) = random_pyq(&questions).cloned() else {
        bot.send_message(msg.chat.id, NO_QUESTIONS).await?;
        return Ok(());
    };

    bot.send_chat_action(msg.chat.id, ChatAction::UploadPhoto).await?;

    let fonts = state.fonts();
    let (text, options) = pyq_plain_parts(&question);
    let title = card_title(&question);
    let rendered = tokio::task::spawn_blocking(move || {
        render_quiz_card(&fonts, &title, &text, &options, "Eduhub · answer below")
    })
    .await;

    let png = match rendered {
        Ok(Ok(png)) => Some(png),
        Ok(Err(e)) => {
            warn!(chat_id = %msg.chat.id, error = %e, "Quiz card render failed, sending text");
            None
        }
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "Quiz card render task failed");
            None
        }
    };

    if let Some(png) = png {
        let sent = bot
            .send_photo(msg.chat.id, InputFile::memory(png).file_name("quiz.png"))
            .caption("Here's your random quiz!")
            .await;
        match sent {
            Ok(_) => {
                if !question.correct_options.is_empty() {
                    let answer = format!(
                        "Answer: <tg-spoiler>{}</tg-spoiler>",
                        html_escape(&question.correct_options.join(", "))
                    );
                    bot.send_message(msg.chat.id, answer)
                        .parse_mode(ParseMode::Html)
                        .await?;
                }
                return Ok(());
            }
            Err(e) => warn!(chat_id = %msg.chat.id, error = %e, "Failed to send quiz card, sending text"),
        }
    }

    bot.send_message(msg.chat.id, format_pyq(&question))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

fn random_quote(quotes: &[Quote]) -> Option<String> {
    quotes.choose(&mut rand::thread_rng()).map(format_quote)
}

/// Handle the /quote command.
pub async fn handle_quote(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let quotes = match state.quotes().await {
        Ok(quotes) => quotes,
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "Failed to fetch quotes");
            bot.send_message(msg.chat.id, "⚠️ Failed to fetch quote. Try again later.")
                .await?;
            return Ok(());
        }
    };

    let Some(text) = random_quote(&quotes) else {
        bot.send_message(msg.chat.id, "❌ No quotes found.").await?;
        return Ok(());
    };

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Handle the /gen command - draw a logo for a name.
pub async fn handle_gen(bot: Bot, msg: Message, state: Arc<BotState>, name: String) -> ResponseResult<()> {
    let name = name.trim().to_string();
    if name.is_empty() {
        bot.send_message(
            msg.chat.id,
            "❗ Please provide a name.\nExample: <code>/gen EduHub</code>",
        )
        .parse_mode(ParseMode::Html)
        .await?;
        return Ok(());
    }

    bot.send_chat_action(msg.chat.id, ChatAction::UploadPhoto).await?;

    let fonts = state.fonts();
    let text = name.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        let mut rng = StdRng::from_entropy();
        let style = LogoStyle::random(&mut rng);
        render_logo(&fonts, &text, &style, &mut rng)
    })
    .await;

    let png = match rendered {
        Ok(Ok(png)) => Some(png),
        Ok(Err(e)) => {
            warn!(chat_id = %msg.chat.id, error = %e, "Logo render failed, sending text");
            None
        }
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "Logo render task failed");
            None
        }
    };

    if let Some(png) = png {
        debug!(chat_id = %msg.chat.id, bytes = png.len(), "Logo rendered");
        let sent = bot
            .send_photo(msg.chat.id, InputFile::memory(png).file_name("logo.png"))
            .caption(logo_caption(&name))
            .parse_mode(ParseMode::Html)
            .await;
        match sent {
            Ok(_) => return Ok(()),
            Err(e) => warn!(chat_id = %msg.chat.id, error = %e, "Failed to send logo, sending text"),
        }
    }

    bot.send_message(msg.chat.id, logo_fallback(&name))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Longest name echoed back in /gen replies.
const ECHOED_NAME_LIMIT: usize = 200;

/// Caption of a generated logo; always within Telegram's caption limit.
pub fn logo_caption(name: &str) -> String {
    format!(
        "✨ Here's your generated logo for <b>{}</b>",
        html_escape(&truncate_chars(name, ECHOED_NAME_LIMIT))
    )
}

/// Text sent when no logo image could be drawn.
pub fn logo_fallback(name: &str) -> String {
    format!(
        "⚠️ Couldn't draw a logo right now, so here it is in text:\n\n✨ <b>{}</b> ✨",
        html_escape(&truncate_chars(&name.to_uppercase(), ECHOED_NAME_LIMIT))
    )
}

/// The fields shown by /me.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeDetails {
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub user_id: u64,
    pub chat_id: i64,
    pub language_code: Option<String>,
    pub is_bot: bool,
}

/// HTML body of the /me reply.
pub fn format_me(me: &MeDetails) -> String {
    let or_na = |v: &Option<String>| v.as_deref().map(html_escape).unwrap_or_else(|| "N/A".to_string());
    format!(
        "<b>Your Telegram Details:</b>\n\n\
        👤 <b>First Name:</b> {}\n\
        🧑‍💼 <b>Last Name:</b> {}\n\
        📛 <b>Username:</b> {}\n\
        🆔 <b>User ID:</b> <code>{}</code>\n\
        💬 <b>Chat ID:</b> <code>{}</code>\n\
        🌐 <b>Language Code:</b> {}\n\
        🤖 <b>Is Bot:</b> {}",
        html_escape(&me.first_name),
        or_na(&me.last_name),
        me.username
            .as_deref()
            .map(|u| format!("@{}", html_escape(u)))
            .unwrap_or_else(|| "N/A".to_string()),
        me.user_id,
        me.chat_id,
        or_na(&me.language_code),
        if me.is_bot { "Yes" } else { "No" }
    )
}

/// Handle the /me command.
pub async fn handle_me(bot: Bot, msg: Message) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        bot.send_message(msg.chat.id, "Unable to fetch your details.").await?;
        return Ok(());
    };

    let details = MeDetails {
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        username: user.username.clone(),
        user_id: user.id.0,
        chat_id: msg.chat.id.0,
        language_code: user.language_code.clone(),
        is_bot: user.is_bot,
    };
    bot.send_message(msg.chat.id, format_me(&details))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// JavaScript that logs `text`, as an HTML code block.
pub fn java_snippet(text: &str) -> String {
    let literal = text
        .trim()
        .replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${");
    let code = format!("// JavaScript generated from your message\nconsole.log(`{literal}`);");
    format!("<pre><code class=\"language-js\">{}</code></pre>", html_escape(&code))
}

/// Handle the /java and /script commands.
pub async fn handle_java(bot: Bot, msg: Message) -> ResponseResult<()> {
    let Some(text) = msg.reply_to_message().and_then(|m| m.text()) else {
        bot.send_message(
            msg.chat.id,
            "❗ Please reply to a message with /java or /script to convert it into JavaScript.",
        )
        .await?;
        return Ok(());
    };

    bot.send_message(msg.chat.id, java_snippet(text))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

async fn send_quiz_poll(bot: &Bot, chat_id: ChatId, poll: QuizPoll) -> ResponseResult<()> {
    if let Some(image) = poll.image.as_deref() {
        match url::Url::parse(image) {
            Ok(url) => {
                if let Err(e) = bot.send_photo(chat_id, InputFile::url(url)).await {
                    warn!(chat_id = %chat_id, error = %e, "Failed to send question image");
                }
            }
            Err(e) => warn!(image = %image, error = %e, "Question image is not a URL"),
        }
    }

    bot.send_poll(chat_id, poll.question, poll.options)
        .type_(PollType::Quiz)
        .is_anonymous(false)
        .correct_option_id(poll.correct_option_id)
        .explanation(poll.explanation)
        .await?;
    Ok(())
}

/// Handle a quiz shortcut (`/b3`, `/pyqc 5`, `/pyq 2`).
pub async fn handle_shortcut(
    bot: Bot,
    msg: Message,
    state: Arc<BotState>,
    shortcut: QuizShortcut,
) -> ResponseResult<()> {
    let pool = match state.quiz_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "Failed to fetch quiz pool");
            bot.send_message(msg.chat.id, FETCH_FAILED).await?;
            return Ok(());
        }
    };

    let polls: Vec<QuizPoll> = match shortcut {
        QuizShortcut::Indexed { subject, number } => match pick_indexed(&pool, subject, number) {
            Some(q) => QuizPoll::from_question(q).into_iter().collect(),
            None => {
                bot.send_message(
                    msg.chat.id,
                    format!("Question {number} not found in {}.", subject.name()),
                )
                .await?;
                return Ok(());
            }
        },
        QuizShortcut::Random { subject, count } => {
            let picked = pick_random(&pool, subject, count, &mut rand::thread_rng());
            picked
                .into_iter()
                .filter_map(QuizPoll::from_question)
                .collect()
        }
    };

    if polls.is_empty() {
        bot.send_message(msg.chat.id, NO_QUESTIONS).await?;
        return Ok(());
    }

    info!(chat_id = %msg.chat.id, shortcut = ?shortcut, polls = polls.len(), "Sending quiz polls");
    let total = polls.len();
    let mut failed = 0;
    for poll in polls {
        if let Err(e) = send_quiz_poll(&bot, msg.chat.id, poll).await {
            failed += 1;
            warn!(chat_id = %msg.chat.id, error = %e, "Failed to send quiz poll");
        }
    }

    if let Some(notice) = poll_failure_notice(failed, total) {
        bot.send_message(msg.chat.id, notice).await?;
    }
    Ok(())
}

/// Tell the user how many polls Telegram refused, if any.
pub fn poll_failure_notice(failed: usize, total: usize) -> Option<String> {
    match failed {
        0 => None,
        n if n == total && total == 1 => Some("⚠️ Couldn't send that question. Try another one.".to_string()),
        n if n == total => Some("⚠️ Couldn't send any of those questions. Try again later.".to_string()),
        n => Some(format!("⚠️ {n} of {total} questions couldn't be sent.")),
    }
}

/// Drop a trailing `@BotName` from the command word.
pub fn strip_bot_mention(text: &str) -> String {
    let text = text.trim();
    let (head, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    let head = head.split_once('@').map_or(head, |(cmd, _)| cmd);
    if rest.is_empty() {
        head.to_string()
    } else {
        format!("{head} {}", rest.trim())
    }
}

/// How a plain text message is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// Looks like a quiz answer or code (`p1`, `qr`); stay quiet.
    QuizLike,
    /// The word "start".
    Start,
    Greeting,
    Other,
}

const GREETINGS: &[&str] = &["hi", "hello", "hey", "hii", "heyy", "hola"];

fn quiz_like_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[pbcq](\d+|r)$").expect("valid regex"))
}

pub fn classify_text(text: &str) -> TextKind {
    let text = text.trim().to_lowercase();
    if quiz_like_regex().is_match(&text) {
        TextKind::QuizLike
    } else if text == "start" {
        TextKind::Start
    } else if GREETINGS.contains(&text.as_str()) {
        TextKind::Greeting
    } else {
        TextKind::Other
    }
}

/// One of the friendly greeting replies.
pub fn greeting_reply<R: Rng + ?Sized>(name: &str, rng: &mut R) -> String {
    let replies = [
        format!("Hey dear {name}, how may I help you?"),
        format!("Hello {name}! What can I do for you today?"),
        format!("Hi {name}, how can I assist you?"),
        format!("Greetings {name}! Need any help?"),
        format!("Hey {name}! I'm here to help."),
    ];
    let index = rng.gen_range(0..replies.len());
    replies[index].clone()
}

/// Handle regular text messages.
pub async fn handle_message(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    remember_chat(&state, &msg).await;

    let Some(text) = msg.text() else {
        return Ok(());
    };
    let name = display_name(&msg);

    match classify_text(text) {
        TextKind::QuizLike => {}
        TextKind::Start => handle_start(bot, msg).await?,
        TextKind::Greeting => {
            let reply = greeting_reply(&name, &mut rand::thread_rng());
            bot.send_message(msg.chat.id, reply).await?;
            bot.send_message(msg.chat.id, "For practice, just send /quiz or try /b1!")
                .await?;
        }
        TextKind::Other => {
            // Groups are busy; only answer free text in private chats.
            if msg.chat.is_private() {
                bot.send_message(msg.chat.id, format!("Hey {name}, how can I help you?"))
                    .await?;
            }
        }
    }
    Ok(())
}

/// Handle a `/word` that is neither a command nor a quiz shortcut.
pub async fn handle_unknown_command(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    remember_chat(&state, &msg).await;

    // Groups see commands meant for other bots; stay quiet there.
    if !msg.chat.is_private() {
        return Ok(());
    }
    if let Some(text) = msg.text() {
        info!(cmd = %text, "Unrecognized command - sending response");
        bot.send_message(
            msg.chat.id,
            format!(
                "Unknown command: {}\n\nUse /help to see available commands.",
                text.split_whitespace().next().unwrap_or(text)
            ),
        )
        .await?;
    }
    Ok(())
}

/// Route a parsed command to its handler.
pub async fn handle_command(bot: Bot, msg: Message, cmd: Command, state: Arc<BotState>) -> ResponseResult<()> {
    remember_chat(&state, &msg).await;

    match cmd {
        Command::Start => handle_start(bot, msg).await,
        Command::Help => handle_help(bot, msg).await,
        Command::About => handle_about(bot, msg).await,
        Command::Quiz => handle_quiz(bot, msg, state).await,
        Command::Pyq(arg) => handle_pyq(bot, msg, state, arg).await,
        Command::Quizimg => handle_quizimg(bot, msg, state).await,
        Command::Quote => handle_quote(bot, msg, state).await,
        Command::Gen(name) => handle_gen(bot, msg, state, name).await,
        Command::Me => handle_me(bot, msg).await,
        Command::Java | Command::Script => handle_java(bot, msg).await,
        Command::Ban(arg) => handle_moderation(bot, msg, state, ModAction::Ban, arg).await,
        Command::Unban(arg) => handle_moderation(bot, msg, state, ModAction::Unban, arg).await,
        Command::Mute(arg) => handle_moderation(bot, msg, state, ModAction::Mute, arg).await,
        Command::Unmute(arg) => handle_moderation(bot, msg, state, ModAction::Unmute, arg).await,
        Command::Warn(arg) => handle_moderation(bot, msg, state, ModAction::Warn, arg).await,
        Command::Warns(arg) => handle_moderation(bot, msg, state, ModAction::Warns, arg).await,
        Command::Resetwarns(arg) => {
            handle_moderation(bot, msg, state, ModAction::ResetWarns, arg).await
        }
        Command::Broadcast(text) => handle_broadcast(bot, msg, state, text).await,
        Command::Reply(arg) => handle_reply(bot, msg, state, arg).await,
        Command::Users => handle_users(bot, msg, state).await,
    }
}
