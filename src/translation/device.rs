// Compute device selection for ONNX Runtime sessions
use ort::execution_providers::{
    CPUExecutionProvider, CUDAExecutionProvider, CoreMLExecutionProvider,
    ExecutionProvider, ExecutionProviderDispatch,
};
use std::fmt;

use crate::config::DevicePreference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accelerator {
    /// Apple GPU / Neural Engine
    CoreML,
    Cuda,
}

/// Where inference runs; decided once when the engine is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Accelerated(Accelerator),
    GeneralPurpose,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Accelerated(Accelerator::CoreML) => write!(f, "GPU (CoreML)"),
            Device::Accelerated(Accelerator::Cuda) => write!(f, "GPU (CUDA)"),
            Device::GeneralPurpose => write!(f, "CPU"),
        }
    }
}

impl Device {
    /// Execution providers in registration order; CPU is always the last resort
    pub fn execution_providers(&self) -> Vec<ExecutionProviderDispatch> {
        let cpu = CPUExecutionProvider::default().build();
        match self {
            Device::Accelerated(Accelerator::CoreML) => {
                vec![CoreMLExecutionProvider::default().build(), cpu]
            }
            Device::Accelerated(Accelerator::Cuda) => {
                vec![CUDAExecutionProvider::default().build(), cpu]
            }
            Device::GeneralPurpose => vec![cpu],
        }
    }
}

/// "Is an accelerator usable?" capability query
pub trait DeviceProbe {
    fn available_accelerator(&self) -> Option<Accelerator>;
}

/// Asks the ONNX Runtime build which execution providers it can use
#[derive(Debug, Default, Clone, Copy)]
pub struct OrtDeviceProbe;

impl DeviceProbe for OrtDeviceProbe {
    fn available_accelerator(&self) -> Option<Accelerator> {
        if CoreMLExecutionProvider::default().is_available().unwrap_or(false) {
            return Some(Accelerator::CoreML);
        }
        if CUDAExecutionProvider::default().is_available().unwrap_or(false) {
            return Some(Accelerator::Cuda);
        }
        None
    }
}

pub fn select_device(probe: &dyn DeviceProbe, preference: DevicePreference) -> Device {
    match preference {
        DevicePreference::Cpu => Device::GeneralPurpose,
        DevicePreference::Auto => probe
            .available_accelerator()
            .map(Device::Accelerated)
            .unwrap_or(Device::GeneralPurpose),
    }
}
