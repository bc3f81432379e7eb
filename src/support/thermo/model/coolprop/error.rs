use std::sync::PoisonError;

use thiserror::Error;

use crate::support::thermo::PropertyError;

/// Errors returned by the [`CoolProp`](super::CoolProp) model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoolPropError {
    #[error(transparent)]
    Rfluids(#[from] rfluids::native::CoolPropError),

    /// Another thread panicked while holding the abstract state.
    #[error("CoolProp abstract state lock poisoned")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for CoolPropError {
    fn from(_: PoisonError<T>) -> Self {
        Self::Poisoned
    }
}

impl From<CoolPropError> for PropertyError {
    fn from(error: CoolPropError) -> Self {
        let context = error.to_string();
        match error {
            CoolPropError::Rfluids(_) => classify(context),
            CoolPropError::Poisoned => PropertyError::Calculation { context },
        }
    }
}

/// Kind of failure a CoolProp message describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Undefined,
    OutOfDomain,
    InvalidState,
}

/// Message fragments, lowercase, checked in order.
///
/// CoolProp reports every failure as free text, so saturation queries
/// outside the dome and states past the critical point are told apart by
/// wording alone.
const MARKERS: &[(&str, Kind)] = &[
    ("not defined", Kind::Undefined),
    ("not in range", Kind::OutOfDomain),
    ("out of range", Kind::OutOfDomain),
    ("outside the range of validity", Kind::OutOfDomain),
    ("must be in range", Kind::OutOfDomain),
    ("must be between", Kind::OutOfDomain),
    ("quality must be", Kind::OutOfDomain),
    ("above the critical", Kind::OutOfDomain),
    ("not a valid number", Kind::InvalidState),
    ("invalid state", Kind::InvalidState),
    ("invalid number", Kind::InvalidState),
];

/// Maps a CoolProp message to a [`PropertyError`], falling back to
/// [`PropertyError::Calculation`].
fn classify(context: String) -> PropertyError {
    let lowered = context.to_lowercase();
    let kind = MARKERS
        .iter()
        .find(|(marker, _)| lowered.contains(marker))
        .map(|&(_, kind)| kind);

    match kind {
        Some(Kind::Undefined) => PropertyError::Undefined { context },
        Some(Kind::OutOfDomain) => PropertyError::OutOfDomain { context },
        Some(Kind::InvalidState) => PropertyError::InvalidState { context },
        None => PropertyError::Calculation { context },
    }
}
