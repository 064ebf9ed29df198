//! Resource services: validate payloads, call the store, and assemble nested read models.

mod company;
mod industry;
mod invoice;
mod validation;

pub use company::CompanyService;
pub use industry::IndustryService;
pub use invoice::InvoiceService;
pub use validation::{parse_id, require};
