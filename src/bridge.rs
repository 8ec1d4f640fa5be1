//! The bridging run
//!
//! 1. Resolve source names (arguments, or a pick from remembered names)
//! 2. Look up their nodes and remember the names that resolved
//! 3. Start the headless browser and wait for the capture node
//! 4. Link the sources and a join sound into the capture node
//! 5. On Ctrl+C, link a leave sound, let it play, stop the browser

use crate::console;
use crate::graph::{
    into_destination, link_all, wait_with_timeout, AudioGraph, GraphError, GraphReader, PwCli,
    WaitError,
};
use crate::models::NodeId;
use crate::prompt;
use crate::settings::Settings;
use crate::shutdown::{self, ShutdownToken};
use crate::state::{InfoFlag, RememberedNames};
use crate::trigger::{ensure_silent_wav, BridgePage, BrowserProcess, SoundPlayer};
use log::{debug, info, warn};
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

/// Fatal outcomes of a run
#[derive(Debug)]
pub enum BridgeError {
    /// No source names given and none picked
    NoNames,
    /// None of the requested names matched a node
    NoValidSource,
    /// The capture node never appeared
    CaptureTimeout(WaitError),
    /// Preparing files or processes failed
    Setup(String),
    Graph(GraphError),
}

impl BridgeError {
    /// Suggestion printed under the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            BridgeError::NoNames => Some(r#"use "alsa_playback.osu!" for osu!"#),
            BridgeError::NoValidSource => Some("list node names with: pw-dump | grep node.name"),
            BridgeError::CaptureTimeout(_) => Some("Are you sharing your screen?"),
            BridgeError::Setup(_) | BridgeError::Graph(_) => None,
        }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::NoNames => write!(f, "At least one argument is required"),
            BridgeError::NoValidSource => write!(f, "no valid source found"),
            BridgeError::CaptureTimeout(e) => write!(f, "{}", e),
            BridgeError::Setup(msg) => write!(f, "{}", msg),
            BridgeError::Graph(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<GraphError> for BridgeError {
    fn from(e: GraphError) -> Self {
        BridgeError::Graph(e)
    }
}

/// Source nodes found for the requested names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sources {
    pub ids: Vec<NodeId>,
    /// Names that matched at least one node, in request order
    pub names: Vec<String>,
}

/// The capture node and the browser keeping it alive
pub struct CaptureSession {
    pub capture: NodeId,
    browser: BrowserProcess,
    /// Page the browser loads; removed once the sources are linked
    page: Option<BridgePage>,
}

impl CaptureSession {
    pub fn browser_id(&self) -> Option<u32> {
        self.browser.id()
    }
}

/// Names from the command line, or one picked from `store`
pub fn resolve_names<R: BufRead, W: Write>(
    requested: &[String],
    store: &RememberedNames,
    input: &mut R,
    output: &mut W,
) -> Result<Vec<String>, BridgeError> {
    if !requested.is_empty() {
        return Ok(requested.to_vec());
    }

    let remembered = store.load().unwrap_or_else(|e| {
        warn!("{}", e);
        Vec::new()
    });
    if remembered.is_empty() {
        return Err(BridgeError::NoNames);
    }

    match prompt::select(&remembered, input, output) {
        Ok(Some(name)) => Ok(vec![name]),
        Ok(None) => Err(BridgeError::NoNames),
        Err(e) => Err(BridgeError::Setup(format!("Failed to read selection: {}", e))),
    }
}

pub struct Bridge<G> {
    settings: Settings,
    reader: GraphReader<G>,
    player: SoundPlayer,
}

impl<G: AudioGraph> Bridge<G> {
    pub fn new(settings: Settings, graph: G) -> Self {
        let player = SoundPlayer::new(&settings.player);
        let reader = GraphReader::new(graph).with_max_trims(settings.max_dump_trims);
        Self {
            settings,
            reader,
            player,
        }
    }

    pub fn reader(&self) -> &GraphReader<G> {
        &self.reader
    }

    /// Look up every name; names without a node are reported and skipped
    pub fn resolve_sources(&self, names: &[String]) -> Result<Sources, BridgeError> {
        let mut sources = Sources::default();

        for name in names {
            let ids = self.reader.nodes_by_name(name)?;
            if ids.is_empty() {
                console::warning(&format!("no {} node found", name));
                continue;
            }
            debug!("Source {} -> {:?}", name, ids);
            sources.ids.extend(ids);
            sources.names.push(name.clone());
        }

        if sources.ids.is_empty() {
            return Err(BridgeError::NoValidSource);
        }
        Ok(sources)
    }

    /// Start the browser and wait for the capture node it brings up.
    ///
    /// On timeout the browser is killed before returning.
    pub async fn open_capture(&self) -> Result<CaptureSession, BridgeError> {
        let name = &self.settings.capture_node;
        let baseline = self.reader.nodes_by_name(name)?;

        ensure_silent_wav(&self.settings.keepalive_wav).map_err(BridgeError::Setup)?;
        let page = BridgePage::write(&self.settings.cache_dir, &self.settings.keepalive_wav)
            .map_err(BridgeError::Setup)?;
        let mut browser =
            BrowserProcess::spawn(&self.settings.browser, &page.url()).map_err(BridgeError::Setup)?;

        match wait_with_timeout(&self.reader, name, &baseline, self.settings.capture_poll).await {
            Ok(capture) => {
                info!("Capture node {} appeared", capture);
                Ok(CaptureSession {
                    capture,
                    browser,
                    page: Some(page),
                })
            }
            Err(e) => {
                browser.kill();
                Err(BridgeError::CaptureTimeout(e))
            }
        }
    }

    /// Play `sound` and link the player's node into `capture`.
    ///
    /// Returns the linked node, or `None` if it did not show up in time.
    pub async fn link_sound_effect(&self, sound: &Path, capture: &NodeId) -> Option<NodeId> {
        let name = &self.settings.sfx_node;
        let baseline = match self.reader.nodes_by_name(name) {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Skipping sound effect: {}", e);
                return None;
            }
        };

        self.player.play(sound);

        let node = match wait_with_timeout(&self.reader, name, &baseline, self.settings.sfx_poll).await {
            Ok(node) => node,
            Err(e) => {
                warn!("Skipping sound effect: {}", e);
                return None;
            }
        };

        link_all(self.reader.graph(), &[(node.clone(), capture.clone())]);
        Some(node)
    }

    /// Link all sources into the capture node and play the join sound
    pub async fn connect(&self, sources: &Sources, session: &mut CaptureSession) {
        let report = link_all(self.reader.graph(), &into_destination(&sources.ids, &session.capture));
        if let Some(page) = session.page.take() {
            debug!("Removing bridge page {}", page.path().display());
        }
        if report.all_failed() {
            console::warning("no source could be linked");
        } else {
            info!(
                "Linked {} source node(s) into {} ({} failed)",
                report.linked, session.capture, report.failed
            );
        }

        self.link_sound_effect(&self.settings.join_sound, &session.capture).await;
    }

    /// Leave sound, settle, stop the browser
    pub async fn teardown(&self, session: &mut CaptureSession) {
        self.link_sound_effect(&self.settings.leave_sound, &session.capture).await;
        tokio::time::sleep(self.settings.settle).await;
        debug!("Stopping browser (pid {:?})", session.browser.id());
        session.browser.kill();
        drop(session.page.take());

        let still_playing = self.player.reap();
        if still_playing > 0 {
            debug!("{} sound player(s) still running", still_playing);
        }
    }

    /// Open the capture, link `sources`, and hold the bridge until `shutdown`.
    ///
    /// An interrupt while the capture node is still awaited stops the browser
    /// and returns without teardown. Once the capture is open, any interrupt
    /// leads to the full teardown.
    pub async fn serve(&self, sources: &Sources, shutdown: &ShutdownToken) -> Result<(), BridgeError> {
        let mut session = tokio::select! {
            biased;
            _ = shutdown.wait() => {
                info!("Interrupted before the capture node appeared");
                return Ok(());
            }
            session = self.open_capture() => session?,
        };

        tokio::select! {
            biased;
            _ = shutdown.wait() => debug!("Interrupted while linking"),
            _ = self.connect(sources, &mut session) => {
                println!("🎶 Bridging {} into {} 🎶", sources.names.join(", "), session.capture);
                println!("✅");
                println!("Press Ctrl+C to stop");
                shutdown.wait().await;
            }
        }
        console::clear_line();

        self.teardown(&mut session).await;
        Ok(())
    }
}

/// Run the whole bridge against the PipeWire tools
pub async fn run(settings: Settings) -> Result<(), BridgeError> {
    InfoFlag::new(&settings.info_flag).show_once(|| {
        console::info("You can pass more than one source node name as arguments");
    });

    let store = RememberedNames::new(&settings.names_file);
    let names = resolve_names(
        &settings.source_names,
        &store,
        &mut std::io::stdin().lock(),
        &mut std::io::stderr(),
    )?;

    let graph = PwCli::new(&settings.dump_command, &settings.link_command);
    let bridge = Bridge::new(settings, graph);

    let sources = bridge.resolve_sources(&names)?;
    if let Err(e) = store.remember(&sources.names) {
        warn!("Could not update remembered names: {}", e);
    }

    let token = ShutdownToken::new();
    let _listener = match shutdown::listen_for_interrupt(token.clone()) {
        Ok(listener) => Some(listener),
        Err(e) => {
            warn!("Cannot listen for Ctrl+C: {}", e);
            None
        }
    };

    bridge.serve(&sources, &token).await
}
