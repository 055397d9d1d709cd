// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Date and time values travel as ISO-8601 strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::error::Error;
use crate::resolver::context::{DeserializeContext, SerializeContext};
use crate::serializer::util::{expected, invalid};
use crate::serializer::Serializer;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

fn read_str<'a>(node: &'a Value, context: &DeserializeContext, what: &str) -> Result<&'a str, Error> {
    node.as_str().ok_or_else(|| expected(context, what, node))
}

impl Serializer for NaiveDate {
    fn write(&self, _: &mut SerializeContext) -> Result<Value, Error> {
        Ok(Value::String(self.format(DATE_FORMAT).to_string()))
    }

    fn read(node: &Value, context: &mut DeserializeContext) -> Result<Self, Error> {
        let text = read_str(node, context, "date string")?;
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map_err(|e| invalid(context, format!("invalid date `{text}`: {e}")))
    }
}

impl Serializer for NaiveDateTime {
    fn write(&self, _: &mut SerializeContext) -> Result<Value, Error> {
        Ok(Value::String(self.format(DATE_TIME_FORMAT).to_string()))
    }

    fn read(node: &Value, context: &mut DeserializeContext) -> Result<Self, Error> {
        let text = read_str(node, context, "date-time string")?;
        NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
            .map_err(|e| invalid(context, format!("invalid date-time `{text}`: {e}")))
    }
}

impl Serializer for DateTime<Utc> {
    fn write(&self, _: &mut SerializeContext) -> Result<Value, Error> {
        Ok(Value::String(self.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
    }

    fn read(node: &Value, context: &mut DeserializeContext) -> Result<Self, Error> {
        let text = read_str(node, context, "RFC 3339 timestamp")?;
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| invalid(context, format!("invalid timestamp `{text}`: {e}")))
    }
}
