// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod dataset;
mod features;
mod fields;
mod parameter;
mod surface;
mod zonal;

pub use features::{Boundary, SamplePoint, SamplePointSet, ZoneGeometrySet, ZoneRecord};
pub use fields::{FieldDescriptor, FieldHandle, FieldType, FieldValue};
pub use parameter::DecayExponent;
pub use surface::InterpolatedSurface;
pub use zonal::ZonalStatistic;
