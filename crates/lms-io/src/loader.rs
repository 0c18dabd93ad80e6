//! Grid description loading: reads the text format, places tiles, links
//! chains and validates every production line.
//!
//! # Format
//!
//! ```text
//! <range>
//! _____
//! <producer count>
//! <receiver count>
//! _____
//! <one producer key per line>
//! _____   (optional)
//! <one receiver key per line>
//! _____
//! <2 * range + 1 rows of space-separated tiles: p r b o w>
//! _____
//! <link lines: A-B, A,C or A-B,C>
//! ```
//!
//! A link line `A-B` makes transport `B` feed transport `A`; `A,C` makes `A`
//! feed `C`. Indices are the 1-based column indices handed out to `p`, `r`
//! and `b` tiles in reading order.
//!
//! Loading stops at the first problem; no partial grid is returned.

use crate::config::LoaderConfig;
use crate::error::{FormatError, LoadError};
use lms_core::component::{GridComponent, Transport, TransportId, TransportKind};
use lms_core::coordinate::Coordinate;
use lms_core::grid::GameGrid;
use lms_core::item::Item;
use lms_core::path::PathNetwork;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

// ===========================================================================
// Entry points
// ===========================================================================

/// Load a grid description with the default configuration.
pub fn load<R: BufRead>(reader: R) -> Result<GameGrid, LoadError> {
    GameLoader::default().load(reader)
}

/// Load a grid description held in a string.
pub fn load_str(content: &str) -> Result<GameGrid, LoadError> {
    load(content.as_bytes())
}

/// Load a grid description from a file.
pub fn load_file(path: impl AsRef<Path>) -> Result<GameGrid, LoadError> {
    GameLoader::default().load_file(path)
}

/// Grid description loader.
#[derive(Debug, Clone, Default)]
pub struct GameLoader {
    config: LoaderConfig,
}

impl GameLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<GameGrid, LoadError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading grid description");
        let file = File::open(path)?;
        self.load(BufReader::new(file))
    }

    /// Run the whole pipeline over `reader`.
    pub fn load<R: BufRead>(&self, reader: R) -> Result<GameGrid, LoadError> {
        Session {
            config: &self.config,
            lines: LineReader::new(reader),
        }
        .run()
    }
}

// ===========================================================================
// Line reading
// ===========================================================================

/// Line source with one line of lookahead and a running line number.
struct LineReader<R> {
    lines: io::Lines<R>,
    peeked: Option<String>,
    /// Number of the last consumed line.
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            peeked: None,
            line: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, LoadError> {
        let next = match self.peeked.take() {
            Some(line) => Some(line),
            None => self.fetch()?,
        };
        if next.is_some() {
            self.line += 1;
        }
        Ok(next)
    }

    fn peek(&mut self) -> Result<Option<&str>, LoadError> {
        if self.peeked.is_none() {
            self.peeked = self.fetch()?;
        }
        Ok(self.peeked.as_deref())
    }

    /// Read the line after the last consumed one. `io::Lines` reports bytes
    /// that are not UTF-8 as `InvalidData`.
    fn fetch(&mut self) -> Result<Option<String>, LoadError> {
        match self.lines.next().transpose() {
            Ok(line) => Ok(line),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                Err(fail(Some(self.line + 1), FormatError::InvalidUtf8))
            }
            Err(e) => Err(LoadError::Io(e)),
        }
    }
}

// ===========================================================================
// Pipeline
// ===========================================================================

/// Keys waiting to be claimed by `p` or `r` tiles, in declaration order.
struct KeyQueue {
    keys: std::vec::IntoIter<Item>,
    declared: usize,
}

impl KeyQueue {
    fn new(keys: Vec<Item>) -> Self {
        Self {
            declared: keys.len(),
            keys: keys.into_iter(),
        }
    }

    fn claim(&mut self) -> Option<Item> {
        self.keys.next()
    }

    fn remaining(&self) -> usize {
        self.keys.len()
    }
}

/// One parsed link line.
#[derive(Debug, PartialEq, Eq)]
struct Link {
    node: TransportId,
    previous: Option<TransportId>,
    next: Option<TransportId>,
}

/// State of a single `load` call. Nothing here outlives the call.
struct Session<'c, R> {
    config: &'c LoaderConfig,
    lines: LineReader<R>,
}

impl<R: BufRead> Session<'_, R> {
    fn run(mut self) -> Result<GameGrid, LoadError> {
        let mut grid = self.read_range()?;
        self.expect_separator()?;

        let num_producers = self.read_count("producer")?;
        let num_receivers = self.read_count("receiver")?;
        self.expect_separator()?;

        // The separator between the two key lists may be left out. With no
        // receiver keys it directly follows the one closing the key section.
        let key_separator = self.config.allow_key_separator;
        let producer_keys = self.read_keys(num_producers)?;
        if key_separator && num_receivers > 0 {
            self.optional_separator()?;
        }
        let receiver_keys = self.read_keys(num_receivers)?;
        self.expect_separator()?;
        if key_separator && num_receivers == 0 {
            self.optional_separator()?;
        }
        tracing::debug!(
            range = grid.range(),
            producers = num_producers,
            receivers = num_receivers,
            "header read"
        );

        let mut network = PathNetwork::new();
        self.place_tiles(
            &mut grid,
            &mut network,
            KeyQueue::new(producer_keys),
            KeyQueue::new(receiver_keys),
        )?;
        self.expect_separator()?;
        tracing::debug!(transports = network.len(), "tiles placed");

        let links = self.read_links(&mut network)?;
        tracing::debug!(links, "links applied");

        validate_chains(&network).map_err(|kind| fail(None, kind))?;
        tracing::debug!(chains = network.chains().len(), "grid loaded");

        grid.attach_network(network);
        Ok(grid)
    }

    fn error(&self, kind: FormatError) -> LoadError {
        fail(Some(self.lines.line), kind)
    }

    fn expect_line(&mut self, expected: &'static str) -> Result<String, LoadError> {
        match self.lines.next_line()? {
            Some(line) => Ok(line),
            None => Err(fail(None, FormatError::MissingLine { expected })),
        }
    }

    fn expect_separator(&mut self) -> Result<(), LoadError> {
        let line = self.expect_line("a separator line")?;
        if !self.config.is_separator(&line) {
            return Err(self.error(FormatError::MissingSeparator(line)));
        }
        Ok(())
    }

    /// Consume the next line if it is a separator.
    fn optional_separator(&mut self) -> Result<(), LoadError> {
        let present = match self.lines.peek()? {
            Some(line) => self.config.is_separator(line),
            None => false,
        };
        if present {
            self.lines.next_line()?;
        }
        Ok(())
    }

    // -- Header --

    fn read_range(&mut self) -> Result<GameGrid, LoadError> {
        let line = self.expect_line("the grid range")?;
        let range = line
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|r| *r >= 1)
            .ok_or_else(|| self.error(FormatError::InvalidRange(line.clone())))?;
        let max = self.config.max_range;
        if range > i64::from(max) {
            return Err(self.error(FormatError::RangeTooLarge {
                range: u32::try_from(range).unwrap_or(u32::MAX),
                max,
            }));
        }
        GameGrid::new(range).map_err(|_| self.error(FormatError::InvalidRange(line)))
    }

    fn read_count(&mut self, what: &'static str) -> Result<usize, LoadError> {
        let line = self.expect_line(what)?;
        line.trim()
            .parse::<usize>()
            .map_err(|_| self.error(FormatError::InvalidCount { what, value: line }))
    }

    fn read_keys(&mut self, count: usize) -> Result<Vec<Item>, LoadError> {
        let mut keys = Vec::with_capacity(count);
        for _ in 0..count {
            let line = self.expect_line("an item key")?;
            let key = Item::new(line.trim()).map_err(|e| self.error(FormatError::InvalidKey(e)))?;
            keys.push(key);
        }
        Ok(keys)
    }

    // -- Tiles --

    fn place_tiles(
        &mut self,
        grid: &mut GameGrid,
        network: &mut PathNetwork,
        mut producers: KeyQueue,
        mut receivers: KeyQueue,
    ) -> Result<(), LoadError> {
        let range = grid.range();
        let extent = range as i32;

        for (row, r) in (-extent..=extent).enumerate() {
            let cells: Vec<Coordinate> = Coordinate::row(range, r).collect();
            let line = self.expect_line("a grid row")?;
            let tiles: Vec<&str> = line.split_whitespace().collect();
            if tiles.len() != cells.len() {
                return Err(self.error(FormatError::RowWidth {
                    row: row + 1,
                    expected: cells.len() as u32,
                    found: tiles.len(),
                }));
            }

            for (coordinate, tile) in cells.into_iter().zip(tiles) {
                let component = match tile {
                    "p" => {
                        let declared = producers.declared;
                        let key = producers
                            .claim()
                            .ok_or_else(|| self.error(FormatError::ProducerKeysExhausted(declared)))?;
                        let id = network.next_id();
                        self.add_transport(network, Transport::producer(id, key))?
                    }
                    "r" => {
                        let declared = receivers.declared;
                        let key = receivers
                            .claim()
                            .ok_or_else(|| self.error(FormatError::ReceiverKeysExhausted(declared)))?;
                        let id = network.next_id();
                        self.add_transport(network, Transport::receiver(id, key))?
                    }
                    "b" => {
                        let id = network.next_id();
                        self.add_transport(network, Transport::belt(id))?
                    }
                    "o" => GridComponent::Open,
                    "w" => GridComponent::Wall,
                    other => return Err(self.error(FormatError::UnknownTile(other.to_string()))),
                };
                grid.place(coordinate, component)
                    .map_err(|e| self.error(FormatError::OutsideGrid(e)))?;
            }
        }

        if producers.remaining() > 0 || receivers.remaining() > 0 {
            return Err(self.error(FormatError::UnclaimedKeys {
                producers: producers.remaining(),
                receivers: receivers.remaining(),
            }));
        }
        Ok(())
    }

    fn add_transport(
        &self,
        network: &mut PathNetwork,
        transport: Transport,
    ) -> Result<GridComponent, LoadError> {
        network
            .insert(transport.clone())
            .map_err(|e| self.error(FormatError::Network(e)))?;
        Ok(GridComponent::Transport(transport))
    }

    // -- Links --

    /// Apply every remaining line as a link. Returns the number applied.
    fn read_links(&mut self, network: &mut PathNetwork) -> Result<usize, LoadError> {
        let mut applied = 0;
        while let Some(line) = self.lines.next_line()? {
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            let link = parse_link(text, network.len()).map_err(|kind| self.error(kind))?;
            if let Some(previous) = link.previous {
                network
                    .link(previous, link.node)
                    .map_err(|e| self.error(FormatError::Network(e)))?;
            }
            if let Some(next) = link.next {
                network
                    .link(link.node, next)
                    .map_err(|e| self.error(FormatError::Network(e)))?;
            }
            applied += 1;
        }
        Ok(applied)
    }
}

fn fail(line: Option<usize>, kind: FormatError) -> LoadError {
    match line {
        Some(line) => tracing::warn!(line, error = %kind, "rejecting grid description"),
        None => tracing::warn!(error = %kind, "rejecting grid description"),
    }
    LoadError::Format { line, kind }
}

/// Parse `A`, `A-B`, `A,C` or `A-B,C` against a network of `count`
/// transports.
fn parse_link(text: &str, count: usize) -> Result<Link, FormatError> {
    let malformed = || FormatError::MalformedLink(text.to_string());

    let (current, next) = match text.split_once(',') {
        Some((_, rest)) if rest.contains(',') => return Err(malformed()),
        Some((current, next)) => (current, Some(next)),
        None => (text, None),
    };
    let (node, previous) = match current.split_once('-') {
        Some((_, rest)) if rest.contains('-') => return Err(malformed()),
        Some((node, previous)) => (node, Some(previous)),
        None => (current, None),
    };

    let index = |part: &str| -> Result<TransportId, FormatError> {
        let index = part.trim().parse::<u32>().map_err(|_| malformed())?;
        if index == 0 || index as usize > count {
            return Err(FormatError::IndexOutOfRange { index, count });
        }
        Ok(TransportId(index))
    };

    Ok(Link {
        node: index(node)?,
        previous: previous.map(index).transpose()?,
        next: next.map(index).transpose()?,
    })
}

// ===========================================================================
// Validation
// ===========================================================================

/// Check every transport sits on an acyclic chain running from a producer
/// to a receiver with matching keys. Reports the first failure in id order.
fn validate_chains(network: &PathNetwork) -> Result<(), FormatError> {
    if let Some((transport, _)) = network.iter().find(|(t, _)| network.is_cyclic(t.id())) {
        return Err(FormatError::CyclicChain(transport.id()));
    }

    for (transport, _) in network.iter() {
        let id = transport.id();
        let head = network.head(id).and_then(|h| network.transport(h));
        let tail = network.tail(id).and_then(|t| network.transport(t));

        if let (
            Transport::Receiver { key: expected, .. },
            Some(Transport::Producer {
                id: producer,
                key: found,
            }),
        ) = (transport, head)
        {
            if expected != found {
                return Err(FormatError::KeyMismatch {
                    receiver: id,
                    producer: *producer,
                    expected: expected.clone(),
                    found: found.clone(),
                });
            }
        }

        let head_ok = head.is_some_and(|h| h.kind() == TransportKind::Producer);
        let tail_ok = match transport.kind() {
            TransportKind::Receiver => tail.is_some_and(|t| t.id() == id),
            TransportKind::Producer | TransportKind::Belt => {
                tail.is_some_and(|t| t.kind() == TransportKind::Receiver)
            }
        };
        if !head_ok || !tail_ok {
            return Err(FormatError::IncompleteChain {
                id,
                kind: transport.kind(),
            });
        }
    }
    Ok(())
}
