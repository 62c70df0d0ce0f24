//! Mock bus implementation for testing the MPU-6050 attitude engine

use mpu6050_attitude::RegisterBus;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Gyroscope output registers (X, Y, Z high bytes)
const GYRO_OUT: [u8; 3] = [0x43, 0x45, 0x47];

/// Accelerometer output registers (X, Y, Z high bytes)
const ACCEL_OUT: [u8; 3] = [0x3B, 0x3D, 0x3F];

/// Records operations performed on the mock bus
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Word read operation
    ReadWord {
        /// Device address
        address: u8,
        /// Register address
        register: u8,
    },
    /// Byte write operation
    WriteByte {
        /// Device address
        address: u8,
        /// Register address
        register: u8,
        /// Value that was written
        value: u8,
    },
}

/// Shared state for the mock bus
///
/// Uses `Arc<Mutex<_>>` rather than `Rc<RefCell<_>>` because the bus is moved
/// onto the sampling thread while the test keeps a clone.
#[derive(Debug, Default)]
struct MockState {
    /// Simulated word registers: register -> value
    words: HashMap<u8, i16>,

    /// Simulated byte registers written by the driver
    bytes: HashMap<u8, u8>,

    /// Operations log for verification
    operations: Vec<Operation>,

    /// Number of upcoming reads that fail
    failing_reads: usize,

    /// Failure injection flags
    fail_next_write: bool,
    fail_all_reads: bool,
}

impl MockState {
    fn set_triplet(&mut self, registers: [u8; 3], values: [i16; 3]) {
        for (register, value) in registers.into_iter().zip(values) {
            self.words.insert(register, value);
        }
    }
}

/// Mock bus for testing
#[derive(Clone, Default)]
pub struct MockBus {
    state: Arc<Mutex<MockState>>,
}

impl MockBus {
    /// Create a new mock bus with all registers reading zero
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Set raw gyroscope data (returned on every following read)
    pub fn set_gyro_data(&self, x: i16, y: i16, z: i16) {
        self.lock().set_triplet(GYRO_OUT, [x, y, z]);
    }

    /// Set raw accelerometer data (returned on every following read)
    pub fn set_accel_data(&self, x: i16, y: i16, z: i16) {
        self.lock().set_triplet(ACCEL_OUT, [x, y, z]);
    }

    /// Set a single word register
    #[allow(dead_code)]
    pub fn set_word(&self, register: u8, value: i16) {
        self.lock().words.insert(register, value);
    }

    /// Value last written to a byte register
    #[allow(dead_code)]
    pub fn get_register(&self, register: u8) -> Option<u8> {
        self.lock().bytes.get(&register).copied()
    }

    /// Inject a read failure on the next read operation
    pub fn fail_next_read(&self) {
        self.fail_next_reads(1);
    }

    /// Inject read failures on the next `count` read operations
    pub fn fail_next_reads(&self, count: usize) {
        self.lock().failing_reads = count;
    }

    /// Make every read fail until cleared
    #[allow(dead_code)]
    pub fn fail_all_reads(&self, enable: bool) {
        self.lock().fail_all_reads = enable;
    }

    /// Inject a write failure on the next write operation
    pub fn fail_next_write(&self) {
        self.lock().fail_next_write = true;
    }

    /// Get the operations log
    pub fn operations(&self) -> Vec<Operation> {
        self.lock().operations.clone()
    }

    /// Only the writes from the operations log
    pub fn writes(&self) -> Vec<(u8, u8, u8)> {
        self.lock()
            .operations
            .iter()
            .filter_map(|op| match *op {
                Operation::WriteByte {
                    address,
                    register,
                    value,
                } => Some((address, register, value)),
                Operation::ReadWord { .. } => None,
            })
            .collect()
    }

    /// Count read operations
    pub fn read_count(&self) -> usize {
        self.lock()
            .operations
            .iter()
            .filter(|op| matches!(op, Operation::ReadWord { .. }))
            .count()
    }

    /// Clear the operations log
    pub fn clear_operations(&self) {
        self.lock().operations.clear();
    }
}

/// Mock error type
#[derive(Debug, Clone, PartialEq)]
pub enum MockError {
    /// Simulated communication error
    Communication,
}

impl RegisterBus for MockBus {
    type Error = MockError;

    fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if state.fail_next_write {
            state.fail_next_write = false;
            return Err(MockError::Communication);
        }
        state.operations.push(Operation::WriteByte {
            address,
            register,
            value,
        });
        state.bytes.insert(register, value);
        Ok(())
    }

    fn read_word(&mut self, address: u8, register: u8) -> Result<i16, Self::Error> {
        let mut state = self.lock();
        state
            .operations
            .push(Operation::ReadWord { address, register });
        if state.fail_all_reads {
            return Err(MockError::Communication);
        }
        if state.failing_reads > 0 {
            state.failing_reads -= 1;
            return Err(MockError::Communication);
        }
        Ok(state.words.get(&register).copied().unwrap_or(0))
    }
}
