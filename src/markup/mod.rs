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
//! HTML value extraction.
//!
//! The pages walked through during the login are not an API, the interesting
//! values (CSRF token, redirect link, authorize form, token script) are found
//! with CSS selectors. Absence of a value is not an error here, the caller
//! decides whether it is fatal.

use scraper::{ElementRef, Html, Selector};

pub mod error;

pub use crate::markup::error::MarkupError;

/// Which of the matched nodes to use.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Occurrence {
    First,
    #[default]
    Last,
}

/// Parsed HTML document.
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse<S: AsRef<str>>(body: S) -> Self {
        Self {
            html: Html::parse_document(body.as_ref()),
        }
    }

    /// Value of the attribute of the first element matching the selector.
    pub fn find_attribute(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Option<String>, MarkupError> {
        let selector = parse_selector(selector)?;
        Ok(self
            .html
            .select(&selector)
            .next()
            .and_then(|element| element.value().attr(attribute))
            .map(String::from))
    }

    /// Text content of the selected element.
    pub fn find_text(
        &self,
        selector: &str,
        occurrence: Occurrence,
    ) -> Result<Option<String>, MarkupError> {
        let selector = parse_selector(selector)?;
        let mut matches = self.html.select(&selector);
        let element = match occurrence {
            Occurrence::First => matches.next(),
            Occurrence::Last => matches.last(),
        };
        Ok(element.map(|el| el.text().collect()))
    }

    /// Number of elements matching the selector.
    pub fn count(&self, selector: &str) -> Result<usize, MarkupError> {
        let selector = parse_selector(selector)?;
        Ok(self.html.select(&selector).count())
    }

    /// Visit name and value of every `input` inside the matched elements in
    /// document order. Missing attributes are passed as empty strings.
    pub fn each_form_field<F>(&self, selector: &str, mut visit: F) -> Result<(), MarkupError>
    where
        F: FnMut(&str, &str),
    {
        let selector = parse_selector(selector)?;
        let inputs = parse_selector("input")?;
        for form in self.html.select(&selector) {
            for input in form.select(&inputs) {
                let (name, value) = input_field(&input);
                visit(name, value);
            }
        }
        Ok(())
    }
}

fn input_field<'a>(input: &ElementRef<'a>) -> (&'a str, &'a str) {
    let element = input.value();
    (
        element.attr("name").unwrap_or_default(),
        element.attr("value").unwrap_or_default(),
    )
}

fn parse_selector(selector: &str) -> Result<Selector, MarkupError> {
    Selector::parse(selector).map_err(|err| MarkupError::InvalidSelector {
        selector: selector.into(),
        msg: err.to_string(),
    })
}
