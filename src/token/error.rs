// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// ACS token error.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The script does not contain the token assignment.
    #[error("couldn't extract ACS token from response")]
    TokenExtraction,

    #[error("b64 decoding error: {}", source)]
    Decode {
        /// The source of the error.
        #[from]
        source: base64::DecodeError,
    },

    /// Payload is not an object with the `id_token` string.
    #[error("token payload parse error: {}", source)]
    Parse {
        /// The source of the error.
        #[from]
        source: serde_json::Error,
    },

    #[error("token pattern error")]
    Pattern {
        /// The source of the error.
        #[from]
        source: regex::Error,
    },
}
