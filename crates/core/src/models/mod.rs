pub mod currency;
pub mod form;
pub mod ledger;
pub mod summary;
pub mod transaction;
