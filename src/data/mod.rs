//! Data layer: core types, loading, filtering, and export.
//!
//! Architecture:
//! ```text
//!   employees.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse + enrich → EmployeeDataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────────┐
//!   │ EmployeeDataset │  Vec<EmployeeRecord>, filter indexes
//!   └────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐      ┌──────────┐
//!   │  filter   │ ───▶ │  export   │  filtered rows → csv
//!   └──────────┘      └──────────┘
//! ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
