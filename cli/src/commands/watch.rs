//! Interactive board: reload the users and toggle the shake effects while the
//! clock keeps ticking.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use inquire::Select;
use people_business::load_state::LOADING_MESSAGE;
use people_business::page::SHAKE_CLASS;
use people_business::{LoaderConfig, Page, ReqwestFetcher};
use people_dom::NodeId;
use tracing::instrument;

use crate::commands::render::{body_text, mount_page};
use crate::output::Output;

const SETTLE_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchCommand {
    Reload,
    ToggleImage,
    ToggleTable,
    Quit,
}

impl WatchCommand {
    pub const ALL: [Self; 4] = [Self::Reload, Self::ToggleImage, Self::ToggleTable, Self::Quit];
}

impl fmt::Display for WatchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reload => "reload",
            Self::ToggleImage => "toggle image",
            Self::ToggleTable => "toggle table",
            Self::Quit => "quit",
        })
    }
}

/// Where the next command comes from.
///
/// Reads may block; they run on the blocking pool so the clock and pending
/// loads keep going meanwhile.
pub trait CommandSource: Send + 'static {
    /// `Ok(None)` ends the session like `quit` does.
    fn next_command(&mut self) -> Result<Option<WatchCommand>>;
}

/// Terminal menu; Esc ends the session.
pub struct SelectPrompt;

impl CommandSource for SelectPrompt {
    fn next_command(&mut self) -> Result<Option<WatchCommand>> {
        Select::new("Command:", WatchCommand::ALL.to_vec())
            .with_help_message("Use arrow keys to navigate, Enter to select, Esc to quit")
            .prompt_skippable()
            .context("Failed to read command")
    }
}

/// Mount the page, load once, then take commands from the terminal.
#[instrument(skip_all, name = "watch", fields(url = %config.users_url()))]
pub async fn run_watch(config: LoaderConfig) -> Result<()> {
    let page = mount_page(config, Arc::new(ReqwestFetcher::default()))?;
    page.start().await.context("Startup load did not complete")?;
    let clock = page.spawn_clock();

    let result = watch_loop(&page, SelectPrompt, &Output::new()).await;
    clock.abort();
    result?;
    Ok(())
}

/// Shows the board and applies commands until the source quits or runs dry.
///
/// Returns how many commands were applied.
async fn watch_loop<S: CommandSource>(page: &Page, mut source: S, out: &Output) -> Result<usize> {
    let mut applied = 0;
    loop {
        show_board(page, out)?;

        let (command, returned) = tokio::task::spawn_blocking(move || {
            let command = source.next_command();
            (command, source)
        })
        .await
        .context("Command prompt task failed")?;
        source = returned;

        match command? {
            None | Some(WatchCommand::Quit) => break,
            Some(command) => {
                apply(page, command, out).await?;
                applied += 1;
            }
        }
    }
    out.print("Bye");
    Ok(applied)
}

async fn apply(page: &Page, command: WatchCommand, out: &Output) -> Result<()> {
    let nodes = page.nodes();
    match command {
        WatchCommand::Reload => {
            page.double_click(nodes.caption);
            wait_settled(page).await?;
        }
        WatchCommand::ToggleImage => {
            page.click(nodes.image_button);
            out.print(shake_report("Image", is_shaking(page, nodes.image)?));
        }
        WatchCommand::ToggleTable => {
            page.click(nodes.table_button);
            out.print(shake_report("Table", is_shaking(page, nodes.table)?));
        }
        WatchCommand::Quit => {}
    }
    Ok(())
}

/// Waits until the table body no longer shows the loading placeholder.
///
/// Bounded by the loader timeout.
async fn wait_settled(page: &Page) -> Result<()> {
    let loading = vec![vec![LOADING_MESSAGE.to_owned()]];
    while page
        .table_body()
        .cell_texts()
        .context("Failed to read the table body")?
        == loading
    {
        tokio::time::sleep(SETTLE_POLL).await;
    }
    Ok(())
}

fn is_shaking(page: &Page, node: NodeId) -> Result<bool> {
    page.document()
        .read(|doc| doc.has_class(node, SHAKE_CLASS))
        .context("Failed to read shake state")
}

fn shake_report(target: &str, shaking: bool) -> String {
    if shaking {
        format!("{target}: started shaking")
    } else {
        format!("{target}: stopped shaking")
    }
}

fn show_board(page: &Page, out: &Output) -> Result<()> {
    let clock = page
        .document()
        .read(|doc| doc.text_content(page.nodes().clock))
        .context("Failed to read the clock")?;
    out.print(clock);
    out.print(body_text(page)?);
    Ok(())
}
