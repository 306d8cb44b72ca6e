/// Protocol-level fault classification.
///
/// Each variant names the phase of the transfer that detected the fault,
/// which is what the caller needs to pick a retry strategy. The driver
/// latches the most recent fault until [`clear_error`] is called.
///
/// [`clear_error`]: crate::Dht22::clear_error
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The sensor did not acknowledge the start signal within the
    /// handshake timing bounds. Likely no sensor present or miswired.
    UnacknowledgedTransmission,
    /// The low gap between two bits exceeded 65us. Synchronization with
    /// the sensor was lost mid-frame.
    PastReadIntervalLimit,
    /// A high pulse fell outside both the "0" and "1" duration windows,
    /// or the line stayed high past the measurement bound.
    ReadLengthInvalid,
    /// All 40 bits arrived but the frame failed its checksum.
    ChecksumInvalid,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ErrorKind::UnacknowledgedTransmission => {
                write!(f, "sensor did not acknowledge the start signal")
            }
            ErrorKind::PastReadIntervalLimit => {
                write!(f, "inter-bit low gap exceeded the read interval limit")
            }
            ErrorKind::ReadLengthInvalid => {
                write!(f, "pulse duration outside the 0/1 classification windows")
            }
            ErrorKind::ChecksumInvalid => write!(f, "frame checksum mismatch"),
        }
    }
}

/// Possible errors from a read attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// A protocol fault detected by the state machine. Also latched on the
    /// driver instance.
    Protocol(ErrorKind),
    /// Error from the GPIO pin (input/output).
    Pin(E),
}

impl<E> DhtError<E> {
    /// Protocol fault kind, if this is a protocol error.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            DhtError::Protocol(kind) => Some(*kind),
            DhtError::Pin(_) => None,
        }
    }
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::Pin(value)
    }
}

impl<E> core::fmt::Display for DhtError<E>
where
    E: core::fmt::Display,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DhtError::Protocol(kind) => write!(f, "{kind}"),
            DhtError::Pin(e) => write!(f, "pin error: {e}"),
        }
    }
}
