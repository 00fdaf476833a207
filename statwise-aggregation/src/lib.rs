#![deny(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod aggregation;
pub mod bounds;
pub mod count;
pub mod distribution;
pub mod value;

pub use aggregation::{Aggregation, AggregationKind, AggregationStrategy};
pub use count::CountAggregation;
pub use distribution::{BucketRange, DistributionAggregation};
pub use value::{
    AggregationData, AggregationSnapshot, CountData, DistributionData, DistributionSnapshot,
};

pub use statwise_core::{AggregationValue, CloseValue, CloseValueRef, MergeError, ValidationError};
