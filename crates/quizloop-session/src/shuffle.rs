//! Answer-option shuffling.
//!
//! Each time a question is presented its four labelled options are permuted
//! and assigned to the numbered display slots `1..=4`. Every slot remembers
//! which original label it shows so a click can be checked against the
//! question's correct label.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::question::{OptionLabel, Question};

/// Number of display slots per question.
pub const SLOT_COUNT: usize = 4;

/// One shuffled option as shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayedOption {
    /// Display slot number, `1..=4`.
    pub slot: u8,
    /// Original label of the option shown in this slot.
    pub label: OptionLabel,
    /// Option text.
    pub text: String,
}

impl DisplayedOption {
    /// Text shown on the option button, e.g. `"2. Old smartphone"`.
    #[must_use]
    pub fn caption(&self) -> String {
        format!("{}. {}", self.slot, self.text)
    }
}

/// Shuffles `items` in place with the Fisher-Yates algorithm.
///
/// For `i` from the last index down to 1 a uniform `j` in `[0, i]` is drawn
/// and the two positions are swapped.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Builds the four displayed options for `question` in a fresh random order.
pub fn present_options<R: Rng + ?Sized>(
    question: &Question,
    rng: &mut R,
) -> [DisplayedOption; SLOT_COUNT] {
    let mut labels = OptionLabel::ALL;
    fisher_yates(&mut labels, rng);

    let mut slot = 0u8;
    labels.map(|label| {
        slot += 1;
        DisplayedOption {
            slot,
            label,
            text: question.options.text(label).to_string(),
        }
    })
}
