use core::convert::Infallible;
use core::fmt::Debug;

/// Capability boundary towards the USB host transport.
///
/// The transport owns enumeration and interrupt transfers; the core
/// only ever sees raw report buffers. Implementations must request the
/// next report again before returning from `poll` once one has been
/// delivered — a transport that forgets the re-arm stalls key updates
/// permanently.
pub trait ReportSource {
    type Error: Debug;

    /// Services the transport, invoking `deliver` once per report that
    /// arrived since the previous call.
    fn poll<F: FnMut(&[u8])>(&mut self, deliver: F) -> Result<(), Self::Error>;
}

/// A transport with no keyboard behind it. Useful on boards where the
/// host stack is brought up separately, and in tests.
pub struct NullReportSource;

impl ReportSource for NullReportSource {
    type Error = Infallible;

    fn poll<F: FnMut(&[u8])>(&mut self, _deliver: F) -> Result<(), Self::Error> {
        Ok(())
    }
}
