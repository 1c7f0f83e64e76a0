pub mod client;
pub mod source;
pub mod types;

pub use client::RestCountriesClient;
pub use source::{CountrySource, FetchError};
pub use types::{CountryName, CountryRecord, Currency, Flags, NativeName, format_population};
