pub mod da;
pub mod gens;
pub mod m2;
