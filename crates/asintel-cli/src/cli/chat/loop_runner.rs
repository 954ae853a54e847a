//! Main chat loop orchestration.
//!
//! Owns the dispatcher for the lifetime of the session and drives a
//! `select!` between readline input and retrieval results. Retrievals
//! run as spawned tasks so the user can keep typing; results come back
//! over a channel and are appended to the conversation in arrival
//! order, flagged stale when a newer request has been dispatched since.

use std::io::Write;
use std::sync::Arc;

use console::style;
use tokio::sync::mpsc;
use tracing::warn;

use asintel_core::dispatch::{DispatchOutcome, Dispatcher, Trigger};
use asintel_core::provider::ProductProvider;
use asintel_types::chat::Sender;
use asintel_types::retrieval::{Domain, ProviderError, RetrievalResponse};

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

type RetrievalResult = (u64, Result<RetrievalResponse, ProviderError>);

/// Run the interactive analysis chat loop.
pub async fn run_chat_loop(state: &AppState, domain: Option<String>) -> anyhow::Result<()> {
    let domain = match domain {
        Some(code) => code.parse::<Domain>().map_err(|e| anyhow::anyhow!(e))?,
        None => state.config.default_domain,
    };

    let provider = Arc::new(state.provider()?);
    let mut dispatcher = Dispatcher::new(state.config.default_fields.clone(), domain);

    print_welcome_banner(
        domain,
        &state.config.default_fields,
        &dispatcher.session().id().to_string(),
    );

    // Render the seeded greeting before the prompt appears.
    let mut rendered: u64 = 0;
    render_new_turns(&dispatcher, &mut rendered, &mut std::io::stdout())?;

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, mut writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("failed to initialize input: {e}"))?;

    let (results_tx, mut results_rx) = mpsc::channel::<RetrievalResult>(8);

    loop {
        tokio::select! {
            event = chat_input.read_line() => match event {
                InputEvent::Eof => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                InputEvent::Interrupted => {
                    println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                    continue;
                }
                InputEvent::Message(text) => {
                    if text.is_empty() {
                        continue;
                    }

                    let trigger = match commands::parse(&text) {
                        Some(ChatCommand::Help) => {
                            commands::print_help();
                            continue;
                        }
                        Some(ChatCommand::Clear) => {
                            chat_input.clear();
                            continue;
                        }
                        Some(ChatCommand::Fields) => {
                            commands::print_fields();
                            continue;
                        }
                        Some(ChatCommand::History) => {
                            print_history(&dispatcher);
                            continue;
                        }
                        Some(ChatCommand::Exit) => {
                            println!("\n  {}", style("Session ended.").dim());
                            break;
                        }
                        Some(ChatCommand::Load(path)) => {
                            match tokio::fs::read_to_string(&path).await {
                                Ok(contents) => Trigger::FileSelected {
                                    name: path.display().to_string(),
                                    contents,
                                },
                                Err(e) => {
                                    println!(
                                        "\n  {} Could not read {}: {e}\n",
                                        style("!").red().bold(),
                                        style(path.display()).cyan()
                                    );
                                    continue;
                                }
                            }
                        }
                        Some(ChatCommand::Paste) => {
                            match read_pasted_block(&mut chat_input).await {
                                Some(contents) => Trigger::TextPasted { contents },
                                None => continue,
                            }
                        }
                        Some(ChatCommand::Get) => Trigger::ExplicitAction,
                        Some(ChatCommand::Unknown(cmd_name)) => {
                            println!(
                                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                                style("?").yellow().bold(),
                                style(cmd_name).dim()
                            );
                            continue;
                        }
                        None => Trigger::ChatUtterance { text },
                    };

                    let outcome = dispatcher.dispatch(trigger);
                    if let DispatchOutcome::RetrievalStarted { request, generation } = outcome {
                        println!(
                            "  {}",
                            style(format!(
                                "Looking up {} ASIN(s) on {}...",
                                request.batch.len(),
                                request.domain
                            ))
                            .dim()
                        );
                        let provider = Arc::clone(&provider);
                        let tx = results_tx.clone();
                        tokio::spawn(async move {
                            let result = provider.fetch(&request).await;
                            if tx.send((generation, result)).await.is_err() {
                                warn!("Chat loop closed before retrieval finished");
                            }
                        });
                    }
                    render_new_turns(&dispatcher, &mut rendered, &mut std::io::stdout())?;
                }
            },

            Some((generation, result)) = results_rx.recv() => {
                dispatcher.complete_retrieval(generation, result);
                // Goes through the shared writer so the prompt survives.
                render_new_turns(&dispatcher, &mut rendered, &mut writer)?;
            }
        }
    }

    Ok(())
}

/// Collect lines until an empty line or EOF.
async fn read_pasted_block(chat_input: &mut ChatInput) -> Option<String> {
    println!(
        "  {}",
        style("Paste your ASINs, then submit an empty line.").dim()
    );
    let mut lines = Vec::new();
    loop {
        match chat_input.read_line().await {
            InputEvent::Message(line) if line.is_empty() => break,
            InputEvent::Message(line) => lines.push(line),
            InputEvent::Eof | InputEvent::Interrupted => {
                if lines.is_empty() {
                    return None;
                }
                break;
            }
        }
    }
    Some(lines.join("\n"))
}

/// Print agent turns appended since the last render.
///
/// `next_id` tracks the first turn not yet seen; user turns advance it
/// without printing because the terminal already echoed them.
fn render_new_turns(
    dispatcher: &Dispatcher,
    next_id: &mut u64,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    let new_turns: Vec<_> = dispatcher
        .session()
        .history()
        .filter(|t| t.id >= *next_id)
        .collect();

    for turn in new_turns {
        *next_id = turn.id + 1;
        if turn.sender != Sender::Agent {
            continue;
        }
        writeln!(out)?;
        if turn.stale {
            writeln!(
                out,
                "  {}",
                style("(stale: a newer request was made after this one)").yellow()
            )?;
        }
        let mut lines = turn.text.lines();
        if let Some(first) = lines.next() {
            writeln!(out, "  {} {first}", style("Asintel >").cyan().bold())?;
        }
        for line in lines {
            writeln!(out, "            {line}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Print the full conversation so far.
fn print_history(dispatcher: &Dispatcher) {
    println!();
    for turn in dispatcher.session().history() {
        let label = match turn.sender {
            Sender::User => style("You").green().bold(),
            Sender::Agent => style("Asintel").cyan().bold(),
        };
        let stale = if turn.stale {
            format!(" {}", style("(stale)").yellow())
        } else {
            String::new()
        };
        let preview = if turn.text.len() > 100 {
            let cut = turn
                .text
                .char_indices()
                .take_while(|(i, _)| *i < 97)
                .last()
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(97);
            format!("{}...", &turn.text[..cut])
        } else {
            turn.text.replace('\n', " ")
        };
        println!("  {label}{stale} {preview}");
    }
    println!();
}
