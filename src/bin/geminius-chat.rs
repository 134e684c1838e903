//! Interactive chat application for conversing with Gemini.
//!
//! This binary provides a streaming REPL interface for chatting with Gemini models, with one
//! staged file per message.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage; the API key comes from .geminius/secrets.yaml or GOOGLE_API_KEY
//! geminius-chat
//!
//! # Specify a model
//! geminius-chat --model gemini-2.5-pro
//!
//! # Set a system prompt
//! geminius-chat --system "You are a helpful coding assistant"
//!
//! # Disable colors (useful for piping output)
//! geminius-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/upload <path>` - Stage a file for the next message
//! - `/new` - Start a new conversation
//! - `/history` - Show the conversation so far
//! - `/status` - Show session status
//! - `/help` - Show available commands
//! - `/quit` - Exit the application

use std::path::Path;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use geminius::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, INTERRUPTED_EXIT_CODE, PlainTextRenderer,
    Renderer, SignalAction, TurnFlag, help_text, load_api_key, parse_command, read_upload,
};
use geminius::{Gemini, Model};

/// Main entry point for the geminius-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("geminius-chat [OPTIONS]");
    let temperature = args.temperature();
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    let client = load_api_key(config.secrets_path.as_deref()).and_then(|key| Gemini::new(Some(key)));
    let mut session = ChatSession::new(client, config.settings());
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    // Signals during a turn are absorbed; otherwise they end the process.
    let turn = TurnFlag::new();
    let turn_clone = turn.clone();
    ctrlc::set_handler(move || match turn_clone.on_signal() {
        SignalAction::Absorb => eprintln!("\n(waiting for the current reply to finish)"),
        SignalAction::Exit => std::process::exit(INTERRUPTED_EXIT_CODE),
    })?;

    println!("Gemini Chat (model: {})", session.model());
    println!("Type /help for commands, /quit to exit\n");
    if let Err(err) = temperature {
        renderer.print_warning(&format!("Ignoring --temperature: {err}"));
    }
    session.render_history(&mut renderer);

    loop {
        if !session.is_configured() {
            show_banner(&session, &mut renderer);
        }
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Upload(path) => match read_upload(Path::new(&path)) {
                            Ok(attachment) => session.upload(attachment, &mut renderer),
                            Err(err) => renderer.print_warning(&err.to_string()),
                        },
                        ChatCommand::ShowAttachment => match session.pending_attachment() {
                            Some(attachment) => renderer.print_info(&format!(
                                "Staged: {} ({}, {} bytes)",
                                attachment.name,
                                attachment.mime_type,
                                attachment.len()
                            )),
                            None => renderer.print_info("No file staged."),
                        },
                        ChatCommand::New => {
                            session.reset();
                            session.render_history(&mut renderer);
                        }
                        ChatCommand::History => {
                            session.render_history(&mut renderer);
                        }
                        ChatCommand::Model(model_name) => {
                            session.set_model(Model::from(model_name.as_str()));
                            renderer.print_info(&format!("Model changed to: {}", model_name));
                        }
                        ChatCommand::System(prompt) => {
                            session.set_system_prompt(prompt.clone());
                            match prompt {
                                Some(p) => {
                                    renderer.print_info(&format!("System prompt set to: {}", p))
                                }
                                None => renderer.print_info("System prompt cleared."),
                            }
                        }
                        ChatCommand::SaveTranscript(path) => {
                            match session.save_transcript_to(&path) {
                                Ok(_) => {
                                    renderer.print_info(&format!("Transcript saved to {}", path))
                                }
                                Err(err) => renderer
                                    .print_error(&format!("Failed to save transcript: {}", err)),
                            }
                        }
                        ChatCommand::LoadTranscript(path) => {
                            match session.load_transcript_from(&path) {
                                Ok(_) => {
                                    renderer.print_info(&format!("Transcript loaded from {}", path));
                                    session.render_history(&mut renderer);
                                }
                                Err(err) => renderer
                                    .print_error(&format!("Failed to load transcript: {}", err)),
                            }
                        }
                        ChatCommand::Status => {
                            print_status(&session);
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                turn.begin();
                session.submit(line, &mut renderer).await;
                turn.end();
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn show_banner(session: &ChatSession, renderer: &mut PlainTextRenderer) {
    if let Some(banner) = session.banner() {
        renderer.print_warning(&banner);
    }
}

fn print_status(session: &ChatSession) {
    let stats = session.stats();
    println!("    Session Status:");
    println!("      Model: {}", stats.model);
    println!(
        "      API key: {}",
        if stats.configured { "configured" } else { "missing" }
    );
    println!("      Messages: {}", stats.message_count);
    println!("      Turns: {} completed, {} failed", stats.turns_completed, stats.turns_failed);
    if let Some(prompt) = stats.system_prompt.as_deref() {
        println!("      System prompt: {}", prompt);
    } else {
        println!("      System prompt: (none)");
    }
    match stats.pending_attachment.as_deref() {
        Some(name) => println!("      Staged file: {}", name),
        None => println!("      Staged file: (none)"),
    }
}
