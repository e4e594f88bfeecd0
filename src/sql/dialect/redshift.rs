//! Amazon Redshift SQL dialect.
//!
//! Redshift features:
//! - PostgreSQL-based syntax and function library
//! - ANSI identifier quoting (`"`)
//! - No GROUPS frames and no column aliases on VALUES

use super::helpers;
use super::postgres::{
    emulate_postgres_family, emulates_postgres_family, postgres_type_name,
    POSTGRES_CONCAT_PRECEDENCE,
};
use super::{DialectProfile, Feature, SqlDialect, Version};
use crate::error::UnparseError;
use crate::sql::emulation::RenderPlan;
use crate::sql::node::{Call, TypeName};
use crate::sql::operator::{Arity, OpKind};

/// Amazon Redshift SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Redshift;

impl SqlDialect for Redshift {
    fn name(&self) -> &'static str {
        "redshift"
    }

    fn concat_precedence(&self) -> Option<u16> {
        Some(POSTGRES_CONCAT_PRECEDENCE)
    }

    fn minimum_version(&self) -> Version {
        Version::new(1, 0)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_postgres(name)
    }

    fn type_name(&self, ty: TypeName) -> &'static str {
        postgres_type_name(ty)
    }

    fn max_precision(&self, ty: TypeName) -> Option<u32> {
        match ty {
            TypeName::Char => Some(4096),
            TypeName::Varchar => Some(65535),
            TypeName::Time | TypeName::Timestamp => Some(6),
            other => helpers::default_max_precision(other),
        }
    }

    fn supports(&self, feature: Feature, _version: Option<Version>) -> bool {
        !matches!(
            feature,
            Feature::WithRollup
                | Feature::WithCube
                | Feature::IfFunction
                | Feature::FloorCeilToUnit
                | Feature::CharacterSet
                | Feature::GroupsFrame
                | Feature::AliasedValues
        )
    }

    fn emulates(&self, kind: OpKind, _version: Option<Version>) -> Option<Arity> {
        emulates_postgres_family(kind)
    }

    fn emulate<'a>(
        &self,
        profile: &DialectProfile,
        call: &'a Call,
    ) -> Result<RenderPlan<'a>, UnparseError> {
        emulate_postgres_family(self.name(), profile, call)
    }
}
