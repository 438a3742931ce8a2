// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! JSON Web Keys ([RFC 7517](https://www.rfc-editor.org/rfc/rfc7517.html)).

mod curve;
mod jwk_operation;
mod jwk_params;
mod jwk_type;

#[allow(clippy::module_inception)]
mod jwk;

pub use self::curve::EcCurve;
pub use self::curve::EcxCurve;
pub use self::curve::EdCurve;
pub use self::jwk::Jwk;
pub use self::jwk_operation::JwkOperation;
pub use self::jwk_params::JwkParams;
pub use self::jwk_params::JwkParamsEc;
pub use self::jwk_params::JwkParamsOct;
pub use self::jwk_params::JwkParamsOkp;
pub use self::jwk_params::JwkParamsRsa;
pub use self::jwk_type::JwkType;
