// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Registered [`Converter`]s of custom parameter types.

use std::{
    any::{self, Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

use derive_more::with_trait::Debug;

use super::Parameter;

/// Type-erased function parsing raw text into a custom parameter type.
pub type Converter =
    Arc<dyn Fn(&str) -> anyhow::Result<Box<dyn Any + Send>> + Send + Sync>;

/// Set of [`Converter`]s keyed by their target type.
///
/// At most one [`Converter`] exists per target type, a later registration
/// replaces an earlier one.
#[derive(Clone, Debug, Default)]
pub struct Converters {
    /// [`Converter`]s by the [`TypeId`] of their target type.
    #[debug("{:?}", names.values().collect::<Vec<_>>())]
    by_type: HashMap<TypeId, Converter>,

    /// Names of the target types, for diagnostics.
    names: HashMap<TypeId, &'static str>,
}

impl Converters {
    /// Registers the given `convert` function for the target type `T`.
    pub fn insert<T, E, F>(&mut self, convert: F)
    where
        T: Parameter + Send,
        E: Into<anyhow::Error>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        let erased: Converter = Arc::new(
            move |raw: &str| -> anyhow::Result<Box<dyn Any + Send>> {
                let value: Box<dyn Any + Send> =
                    Box::new(convert(raw).map_err(Into::into)?);
                Ok(value)
            },
        );
        _ = self.by_type.insert(TypeId::of::<T>(), erased);
        _ = self.names.insert(TypeId::of::<T>(), any::type_name::<T>());
    }

    /// Returns the [`Converter`] targeting the type with the given
    /// [`TypeId`], if any.
    #[must_use]
    pub fn get(&self, type_id: TypeId) -> Option<&Converter> {
        self.by_type.get(&type_id)
    }

    /// Returns the number of registered [`Converter`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Indicates whether there are no [`Converter`]s registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}
