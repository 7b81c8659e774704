pub mod chart;
pub mod insurance;
pub mod legacy;
pub mod loan;
pub mod ppp;
pub mod projection;
pub mod reference;
pub mod vehicle;
