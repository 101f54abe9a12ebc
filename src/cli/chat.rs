use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::chats::format_chat_line;
use super::http_service;
use crate::core::AppConfig;
use crate::emotion::display;
use crate::session::models::UNTITLED;
use crate::session::{
    BestEffortSave, Chat, DeleteOutcome, Message, Sender, SendOutcome, Session, SessionError,
};

const HELP: &str = "\
Type a message and press enter to send it.

/new           save the current conversation and start a new one
/save          save and summarize the current conversation
/list          list saved conversations
/find <text>   list conversations whose title contains <text>
/open <n>      open conversation <n> from the last list
/summary       show the summary of the current conversation
/delete        delete the current conversation
/help          show this message
/quit          leave";

const LOGIN_REQUIRED: &str = "Not logged in or the login expired. Run `nafas login` first.";

#[derive(Debug, PartialEq)]
enum ReplCommand {
    Send(String),
    New,
    Save,
    List,
    Find(String),
    Open(usize),
    Summary,
    Delete,
    Help,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(command) = trimmed.strip_prefix('/') else {
            return ReplCommand::Send(line.to_string());
        };
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };
        match name {
            "new" => ReplCommand::New,
            "save" => ReplCommand::Save,
            "list" => ReplCommand::List,
            "find" => ReplCommand::Find(arg.to_string()),
            "open" => match arg.parse::<usize>() {
                Ok(n) if n > 0 => ReplCommand::Open(n),
                _ => ReplCommand::Unknown(trimmed.to_string()),
            },
            "summary" => ReplCommand::Summary,
            "delete" => ReplCommand::Delete,
            "help" => ReplCommand::Help,
            "quit" | "exit" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(trimmed.to_string()),
        }
    }
}

// Whether the REPL should keep going
enum Flow {
    Continue,
    Stop,
}

fn format_message(msg: &Message) -> String {
    let prefix = match msg.sender {
        Sender::User => "you",
        Sender::Assistant => "bot",
    };
    let mut out = format!("{}> {}", prefix, msg.text);
    if let Some(emotion) = display::render_vector(msg.emotion.as_ref()) {
        out.push('\n');
        out.push_str(&emotion);
    }
    out
}

fn print_history(session: &Session) {
    let state = session.state();
    match state.selected() {
        Some(chat) => println!("== {} ==", chat.title()),
        None => println!("== New conversation =="),
    }
    for msg in state.history().iter() {
        println!("{}", format_message(msg));
    }
}

fn print_summary(chat: &Chat) {
    println!("Title:    {}", chat.title());
    println!("Summary:  {}", chat.summary_text());
    println!(
        "Emotion:  {}",
        chat.dominant_emotion().unwrap_or("Not determined")
    );
    let date = chat
        .summary
        .as_ref()
        .and_then(|s| s.created_at)
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| String::from("Not available"));
    println!("Date:     {}", date);
}

fn confirm(rl: &mut DefaultEditor, question: &str) -> bool {
    match rl.readline(&format!("{} [y/N] ", question)) {
        Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

/// Prints the outcome of an operation that failed. Returns `Stop`
/// when the user has to log in again.
fn report(err: &SessionError, action: &str) -> Flow {
    if err.is_unauthorized() {
        println!("{}", LOGIN_REQUIRED);
        return Flow::Stop;
    }
    println!("Could not {}: {}", action, err.user_message());
    Flow::Continue
}

async fn list_chats(session: &mut Session, listed: &mut Vec<Chat>, query: &str) -> Flow {
    if let Err(err) = session.load_chats(false).await {
        if let Flow::Stop = report(&err, "load conversations") {
            return Flow::Stop;
        }
    }
    *listed = session
        .state()
        .search_chats(query)
        .into_iter()
        .cloned()
        .collect();
    if listed.is_empty() {
        println!("No saved conversations");
    }
    for (i, chat) in listed.iter().enumerate() {
        println!("{}", format_chat_line(i + 1, chat));
    }
    Flow::Continue
}

async fn handle(
    session: &mut Session,
    rl: &mut DefaultEditor,
    listed: &mut Vec<Chat>,
    command: ReplCommand,
) -> Flow {
    match command {
        ReplCommand::Send(text) => match session.send_text(&text).await {
            SendOutcome::Ignored => {}
            SendOutcome::Replied => {
                if let Some(msg) = session.state().history().last() {
                    println!("{}", format_message(msg));
                }
            }
            SendOutcome::Failed(err) => {
                // The error text is part of the conversation now
                if let Some(msg) = session.state().history().last() {
                    println!("{}", format_message(msg));
                }
                if err.is_unauthorized() {
                    println!("{}", LOGIN_REQUIRED);
                    return Flow::Stop;
                }
            }
        },
        ReplCommand::New => {
            if let BestEffortSave::Saved(summary) = session.new_chat().await {
                if let Some(title) = summary.title {
                    println!("Saved \"{}\"", title);
                }
            }
            print_history(session);
        }
        ReplCommand::Save => match session.save_chat().await {
            Ok(summary) => println!(
                "Conversation saved: {}",
                summary.title.as_deref().unwrap_or(UNTITLED)
            ),
            Err(err) => return report(&err, "save the conversation"),
        },
        ReplCommand::List => return list_chats(session, listed, "").await,
        ReplCommand::Find(query) => return list_chats(session, listed, &query).await,
        ReplCommand::Open(n) => {
            let Some(chat) = listed.get(n - 1).cloned() else {
                println!("No conversation {}, use /list first", n);
                return Flow::Continue;
            };
            if let Err(err) = session.select_chat(Some(chat)).await {
                if let Flow::Stop = report(&err, "load the conversation") {
                    return Flow::Stop;
                }
            }
            print_history(session);
        }
        ReplCommand::Summary => match session.state().selected() {
            Some(chat) => print_summary(chat),
            None => println!("This conversation hasn't been saved yet"),
        },
        ReplCommand::Delete => {
            let Some(chat_id) = session.state().selected_id().cloned() else {
                println!("No conversation selected to delete");
                return Flow::Continue;
            };
            let result = session
                .delete_chat(&chat_id, |_| {
                    confirm(rl, "Are you sure you want to delete this conversation?")
                })
                .await;
            match result {
                Ok(DeleteOutcome::Deleted) => {
                    listed.retain(|c| c.id != chat_id);
                    println!("Conversation deleted");
                    print_history(session);
                }
                Ok(DeleteOutcome::Cancelled) => {}
                Err(err) => return report(&err, "delete the conversation"),
            }
        }
        ReplCommand::Help => println!("{}", HELP),
        ReplCommand::Quit => return Flow::Stop,
        ReplCommand::Unknown(input) => println!("Unknown command {}, try /help", input),
    }

    Flow::Continue
}

pub async fn run(config: &AppConfig) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let service = http_service(config)?;
    let mut session = Session::new(Box::new(service));
    let mut listed: Vec<Chat> = Vec::new();

    // Open the most recent conversation on start
    match session.load_chats(true).await {
        Ok(()) => {}
        Err(SessionError::Unauthorized) => {
            println!("{}", LOGIN_REQUIRED);
            return Ok(());
        }
        Err(err) => println!("Could not load conversations: {}", err.user_message()),
    }
    print_history(&session);
    println!("Type /help for commands");

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                let command = ReplCommand::parse(&line);
                if let Flow::Stop = handle(&mut session, &mut rl, &mut listed, command).await {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
