use mxkb_common::dev_warn;

use crate::bus::{BusResponder, DirSensePin, RowSelectPins, SharedBusPins};
use crate::keymap::KeyMap;
use crate::matrix::KeyMatrixState;
use crate::report::{ReportError, ReportTranslator};
use crate::transport::ReportSource;

/// Ties the translator and the bus responder to one shared matrix.
///
/// The owner drives it from a single loop, strictly in this order:
/// service the transport, tick the responder, sleep for the tick
/// period (~1 ms). That ordering is what makes the unsynchronized
/// writer/reader split over [`KeyMatrixState`] sound; anything
/// concurrent needs a lock or per-cell atomics around the matrix.
pub struct KeyboardBridge<S, R, D> {
    matrix: KeyMatrixState,
    translator: ReportTranslator,
    responder: BusResponder<S, R, D>,
}

impl<S, R, D> KeyboardBridge<S, R, D>
where
    S: SharedBusPins,
    R: RowSelectPins,
    D: DirSensePin,
{
    pub fn new(keymap: &'static KeyMap, shared: S, select: R, dir_sense: D) -> Self {
        Self {
            matrix: KeyMatrixState::new(),
            translator: ReportTranslator::new(keymap),
            responder: BusResponder::new(shared, select, dir_sense),
        }
    }

    /// Feeds one raw report to the translator.
    pub fn handle_report(&mut self, raw: &[u8]) -> Result<(), ReportError> {
        self.translator.apply(raw, &mut self.matrix)
    }

    /// Polls the transport and applies whatever reports it delivers.
    /// Malformed reports are dropped here; they leave the matrix
    /// untouched and are not worth stopping the loop for.
    pub fn service<T: ReportSource>(&mut self, transport: &mut T) -> Result<(), T::Error> {
        let translator = &mut self.translator;
        let matrix = &mut self.matrix;
        transport.poll(|raw| {
            if let Err(e) = translator.apply(raw, matrix) {
                dev_warn!("Discarding malformed report: {}", e);
            }
        })
    }

    /// One bus service cycle; see [`BusResponder::tick`].
    pub fn tick(&mut self) {
        self.responder.tick(&self.matrix);
    }

    pub fn matrix(&self) -> &KeyMatrixState {
        &self.matrix
    }
}
