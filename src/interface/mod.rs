//! Interface kernels coupling fields across a subdomain boundary.

mod transfer;

pub use transfer::{
    InterfaceEnergyTransferConfig, InterfaceHenryLawConfig, InterfaceLinearTransferConfig,
    InterfaceTransfer,
};
