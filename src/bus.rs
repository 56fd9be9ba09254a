//! I²C bus scan, run once at boot so the log shows what is wired up.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};
use heapless::Vec;

/// Highest 7-bit address scanned; 0x00 and 0x7F are reserved.
const LAST_ADDR: u8 = 0x7E;

/// Addresses that ACK an empty write, in ascending order. Stops
/// collecting after `N` hits. A NACK means nothing is there; any other
/// bus error is logged and the address skipped.
pub fn scan<I: I2c, const N: usize>(i2c: &mut I) -> Vec<u8, N> {
    let mut found = Vec::new();
    for addr in 0x01..=LAST_ADDR {
        match i2c.write(addr, &[]) {
            Ok(()) => {
                info!("i2c: device at {:#x}", addr);
                if found.push(addr).is_err() {
                    warn!("i2c: scan list full, stopping at {:#x}", addr);
                    break;
                }
            }
            Err(e) => match e.kind() {
                ErrorKind::NoAcknowledge(_) => {}
                kind => warn!("i2c: unknown error at {:#x}: {}", addr, kind),
            },
        }
    }
    if found.is_empty() {
        warn!("i2c: no devices found");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorType, NoAcknowledgeSource, Operation};

    /// Bus where only `present` addresses acknowledge and `faulty`
    /// addresses raise a bus error.
    struct FakeBus {
        present: &'static [u8],
        faulty: &'static [u8],
        attempts: usize,
    }

    impl FakeBus {
        fn new(present: &'static [u8]) -> Self {
            Self {
                present,
                faulty: &[],
                attempts: 0,
            }
        }
    }

    impl ErrorType for FakeBus {
        type Error = ErrorKind;
    }

    impl I2c for FakeBus {
        fn transaction(
            &mut self,
            address: u8,
            _operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            self.attempts += 1;
            if self.faulty.contains(&address) {
                Err(ErrorKind::Bus)
            } else if self.present.contains(&address) {
                Ok(())
            } else {
                Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
            }
        }
    }

    #[test]
    fn finds_sensor_and_display() {
        let mut bus = FakeBus::new(&[0x3C, 0x76]);
        let found: Vec<u8, 8> = scan(&mut bus);
        assert_eq!(found.as_slice(), &[0x3C, 0x76]);
    }

    #[test]
    fn empty_bus() {
        let mut bus = FakeBus::new(&[]);
        let found: Vec<u8, 8> = scan(&mut bus);
        assert!(found.is_empty());
    }

    #[test]
    fn stops_when_list_is_full() {
        let mut bus = FakeBus::new(&[0x10, 0x20, 0x30]);
        let found: Vec<u8, 2> = scan(&mut bus);
        assert_eq!(found.as_slice(), &[0x10, 0x20]);
    }

    #[test]
    fn bus_error_is_skipped_and_scan_continues() {
        let mut bus = FakeBus {
            faulty: &[0x20],
            ..FakeBus::new(&[0x3C, 0x76])
        };
        let found: Vec<u8, 8> = scan(&mut bus);
        assert_eq!(found.as_slice(), &[0x3C, 0x76]);
        assert_eq!(bus.attempts, usize::from(LAST_ADDR));
    }
}
