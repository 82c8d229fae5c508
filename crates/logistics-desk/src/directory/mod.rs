//! Desk Directory
//!
//! Where the lookup tools get their records from. The sample directory
//! serves fixed data; a live one would query the company systems.

mod sample;

pub use sample::SampleDirectory;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Account, PolicyDocument, Warehouse};

/// Directory trait (Strategy pattern)
#[async_trait]
pub trait Directory: Send + Sync {
    /// All policy documents
    async fn policies(&self) -> Result<Vec<PolicyDocument>>;

    /// Account owning the phone number, compared on digits only
    async fn account_by_phone(&self, phone_digits: &str) -> Result<Account>;

    /// All warehouses and pickup points
    async fn warehouses(&self) -> Result<Vec<Warehouse>>;

    /// Directory name
    fn name(&self) -> &str;
}
