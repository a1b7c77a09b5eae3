// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colours for runs. Each run gets a random RGB colour; the same seed always
//! gives the same colours, so plots and HTML legends agree between reruns.

use indexmap::IndexMap;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Channel values are drawn from this range; very dark colours are hard to
/// tell apart on plots.
const MIN_CHANNEL: f64 = 0.1;
const MAX_CHANNEL: f64 = 1.0;

/// An RGB colour with channels in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunColour {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl RunColour {
    /// The colour as 8-bit channels.
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let c = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (c(self.r), c(self.g), c(self.b))
    }

    /// The colour as `#rrggbb`.
    pub fn hex(self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

#[derive(Debug, Clone)]
pub struct RunColours {
    colours: IndexMap<String, RunColour>,
}

impl RunColours {
    pub fn new<S: AsRef<str>>(names: &[S], seed: u64) -> RunColours {
        let mut rng = Pcg64::seed_from_u64(seed);
        let colours = names
            .iter()
            .map(|name| {
                let colour = RunColour {
                    r: rng.gen_range(MIN_CHANNEL..=MAX_CHANNEL),
                    g: rng.gen_range(MIN_CHANNEL..=MAX_CHANNEL),
                    b: rng.gen_range(MIN_CHANNEL..=MAX_CHANNEL),
                };
                (name.as_ref().to_string(), colour)
            })
            .collect();
        RunColours { colours }
    }

    pub fn get(&self, name: &str) -> Option<RunColour> {
        self.colours.get(name).copied()
    }

    pub fn hex(&self, name: &str) -> Option<String> {
        self.get(name).map(RunColour::hex)
    }
}
