// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Byte-level telnet handling: IAC filtering and record splitting.

/// Interpret As Command.
pub(crate) const IAC: u8 = 255;
const DONT: u8 = 254;
const DO: u8 = 253;
const WONT: u8 = 252;
const WILL: u8 = 251;
const SB: u8 = 250;
const SE: u8 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterState {
    Data,
    Iac,
    Option(u8),
    Subnegotiation,
    SubnegotiationIac,
}

/// Output of one [`TelnetFilter::feed`] call.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Filtered {
    /// Application data with every telnet command removed.
    pub(crate) data: Vec<u8>,
    /// Refusals to send back to the server.
    pub(crate) replies: Vec<u8>,
}

/// Strips telnet commands from a byte stream and refuses every option.
///
/// `DO x` is answered with `WONT x` and `WILL x` with `DONT x`. Sequences
/// split across reads are carried over to the next call.
#[derive(Debug)]
pub(crate) struct TelnetFilter {
    state: FilterState,
}

impl TelnetFilter {
    pub(crate) fn new() -> Self {
        Self {
            state: FilterState::Data,
        }
    }

    pub(crate) fn feed(&mut self, input: &[u8]) -> Filtered {
        let mut out = Filtered::default();

        for &byte in input {
            self.state = match (self.state, byte) {
                (FilterState::Data, IAC) => FilterState::Iac,
                (FilterState::Data, b) => {
                    out.data.push(b);
                    FilterState::Data
                }
                // Escaped 0xFF data byte
                (FilterState::Iac, IAC) => {
                    out.data.push(IAC);
                    FilterState::Data
                }
                (FilterState::Iac, cmd @ (DO | DONT | WILL | WONT)) => FilterState::Option(cmd),
                (FilterState::Iac, SB) => FilterState::Subnegotiation,
                (FilterState::Iac, _) => FilterState::Data,
                (FilterState::Option(cmd), option) => {
                    match cmd {
                        DO => out.replies.extend_from_slice(&[IAC, WONT, option]),
                        WILL => out.replies.extend_from_slice(&[IAC, DONT, option]),
                        _ => {}
                    }
                    FilterState::Data
                }
                (FilterState::Subnegotiation, IAC) => FilterState::SubnegotiationIac,
                (FilterState::Subnegotiation, _) => FilterState::Subnegotiation,
                (FilterState::SubnegotiationIac, SE) => FilterState::Data,
                (FilterState::SubnegotiationIac, _) => FilterState::Subnegotiation,
            };
        }

        out
    }
}

/// Longest pending record. Anything longer is dropped up to its separator.
const MAX_RECORD_LEN: usize = 4096;

/// Splits a byte stream into records on a separator.
#[derive(Debug)]
pub(crate) struct LineSplitter {
    separator: Vec<u8>,
    buffer: Vec<u8>,
    /// Offset in `buffer` before which no separator starts.
    scanned: usize,
    /// Set while skipping the rest of an oversized record.
    discarding: bool,
}

impl LineSplitter {
    /// Creates a splitter. `separator` must not be empty.
    pub(crate) fn new(separator: &[u8]) -> Self {
        Self {
            separator: separator.to_vec(),
            buffer: Vec::new(),
            scanned: 0,
            discarding: false,
        }
    }

    /// Appends `input` and returns every completed record, without separators.
    pub(crate) fn push(&mut self, input: &[u8]) -> Vec<Vec<u8>> {
        self.buffer.extend_from_slice(input);
        let sep_len = self.separator.len();

        let mut records = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.buffer[self.scanned..]
            .windows(sep_len)
            .position(|window| window == self.separator.as_slice())
        {
            let end = self.scanned + offset;
            if self.discarding {
                self.discarding = false;
            } else {
                records.push(self.buffer[start..end].to_vec());
            }
            start = end + sep_len;
            self.scanned = start;
        }
        self.buffer.drain(..start);

        if self.buffer.len() > MAX_RECORD_LEN {
            if !self.discarding {
                tracing::warn!(limit = MAX_RECORD_LEN, "Dropping record longer than the limit");
            }
            // A separator may have started in the last bytes.
            let keep = sep_len - 1;
            self.buffer.drain(..self.buffer.len() - keep);
            self.discarding = true;
        }
        self.scanned = self.buffer.len().saturating_sub(sep_len - 1);

        records
    }
}
