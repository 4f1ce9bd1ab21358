//! XML export of artifact dependency graphs.
//!
//! - [`report`]: the dependencies report consuming graph-rank results
//! - [`xml`]: element and attribute writing helpers

pub mod report;
pub mod xml;

pub use report::DependenciesReport;
pub use xml::XmlBuilder;
