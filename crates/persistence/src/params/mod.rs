//! Dynamic query parameters.
//!
//! Raw request parameters are validated against a [`ParamRegistry`] into a
//! [`ParameterSet`], which renders a parameterized predicate, ordering and
//! paging clauses for the storage layer:
//!
//! ```
//! use cadence_persistence::params::{BindValue, ParamRegistry, ParameterSet};
//!
//! let registry = ParamRegistry::song_library();
//! let set = ParameterSet::build(
//!     &registry,
//!     vec![
//!         ("group".to_string(), vec!["Muse".to_string()]),
//!         ("limit".to_string(), vec!["5".to_string()]),
//!     ],
//! )
//! .unwrap();
//!
//! let (query, values) = set.to_query("SELECT * FROM songs");
//! assert_eq!(
//!     query,
//!     "SELECT * FROM songs WHERE 1=1 AND band ILIKE '%' || $1 || '%' ESCAPE '\\' ORDER BY title ASC LIMIT 5;"
//! );
//! assert_eq!(values, vec![BindValue::Text("Muse".to_string())]);
//! ```

pub mod builder;
pub mod error;
pub mod registry;
pub mod value;

pub use builder::{Parameter, ParameterSet};
pub use error::{ParamError, ParseParametersError, RegistryError};
pub use registry::{LIMIT_PARAM, OFFSET_PARAM, ParamEntry, ParamKind, ParamRegistry};
pub use value::{BindValue, DATE_LAYOUT, DateFilter, DateMode, format_date, parse_date};
