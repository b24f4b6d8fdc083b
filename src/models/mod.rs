pub mod defillama;
pub mod pendle;
pub mod yields;
