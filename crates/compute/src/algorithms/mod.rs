//! Building blocks of the conformal detectors: the history window, the
//! nonconformity measures, the p-value computer and the power martingale.

pub mod history;
pub mod martingale;
pub mod nonconformity;
pub mod pvalue;
