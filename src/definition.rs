use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::coords::Cell;
use crate::direction::{Direction, ParseDirectionError, parse_path};
use crate::engine::Engine;
use crate::report::SimStatus;

#[derive(Debug, Error)]
pub enum DefinitionError {
	#[error("Failed to read definition file {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},
	#[error("Line {line}: invalid value for `{key}`: {reason}")]
	Literal { line: usize, key: String, reason: String },
	#[error("Missing key: {0}")]
	MissingKey(&'static str),
	#[error("Schema error: {0}")]
	Schema(String),
	#[error("`{key}` must be positive, got {value}")]
	NonPositive { key: &'static str, value: i32 },
	#[error(transparent)]
	Path(#[from] ParseDirectionError),
}

pub const REQUIRED_KEYS: [&str; 6] = ["test_name", "height", "width", "rocks", "start_pos", "path"];

/// A scenario as written in a definition file:
///
/// ```text
/// test_name="lawnmower_scenario01_valid"
/// height=5
/// width=5
/// rocks=[[1,1], [2,2], [3,3]]
/// start_pos=[0,0]
/// path=["Down", "Down", "Down", "Right", "Up", "Left"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
	pub test_name: String,
	pub height: i32,
	pub width: i32,
	pub rocks: Vec<Cell>,
	pub start_pos: Cell,
	pub path: Vec<Direction>,
}

#[derive(Debug, Deserialize)]
struct RawDefinition {
	test_name: String,
	height: i32,
	width: i32,
	rocks: Vec<Cell>,
	start_pos: Cell,
	path: Vec<String>,
}

impl Definition {
	/// Scenario used when no definition file is given.
	pub fn default_scenario() -> Self {
		Self {
			test_name: "lawnmower_scenario_def_valid".to_string(),
			height: 3,
			width: 2,
			rocks: vec![Cell::new(0, 1), Cell::new(1, 1)],
			start_pos: Cell::ORIGIN,
			path: vec![Direction::Down, Direction::Down, Direction::Right],
		}
	}

	pub fn parse(content: &str) -> Result<Self, DefinitionError> {
		let params = parse_params(content)?;
		for key in REQUIRED_KEYS {
			if !params.contains_key(key) {
				return Err(DefinitionError::MissingKey(key));
			}
		}
		let raw: RawDefinition =
			serde_json::from_value(Value::Object(params)).map_err(|e| DefinitionError::Schema(e.to_string()))?;
		if raw.height <= 0 {
			return Err(DefinitionError::NonPositive { key: "height", value: raw.height });
		}
		if raw.width <= 0 {
			return Err(DefinitionError::NonPositive { key: "width", value: raw.width });
		}
		Ok(Self {
			test_name: raw.test_name,
			height: raw.height,
			width: raw.width,
			rocks: raw.rocks,
			start_pos: raw.start_pos,
			path: parse_path(&raw.path)?,
		})
	}

	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
		let path = path.as_ref();
		let content = fs::read_to_string(path).map_err(|source| DefinitionError::Io {
			path: path.display().to_string(),
			source,
		})?;
		Self::parse(&content)
	}

	pub fn engine(&self) -> Engine {
		Engine::new(self.test_name.clone(), self.height, self.width, self.rocks.clone(), self.start_pos)
	}

	pub fn run(&self) -> SimStatus {
		self.engine().execute_path(&self.path)
	}
}

/// Evaluates every `key=value` line into a JSON map. Lines without `=` and
/// `#` comments are skipped; later keys overwrite earlier ones.
pub fn parse_params(content: &str) -> Result<Map<String, Value>, DefinitionError> {
	let mut params = Map::new();
	for (idx, line) in content.lines().enumerate() {
		let trimmed = line.trim();
		if trimmed.starts_with('#') {
			continue;
		}
		let Some((key, raw)) = trimmed.split_once('=') else {
			continue;
		};
		let key = key.trim();
		let value = parse_literal(raw).map_err(|reason| DefinitionError::Literal {
			line: idx + 1,
			key: key.to_string(),
			reason,
		})?;
		params.insert(key.to_string(), value);
	}
	Ok(params)
}

/// Parses a single literal: integers, quoted strings, `[...]`/`(...)`
/// sequences, `True`, `False` and `None`.
pub fn parse_literal(src: &str) -> Result<Value, String> {
	let mut p = LiteralParser { src: src.as_bytes(), pos: 0 };
	let value = p.value()?;
	p.skip_ws();
	if p.pos != p.src.len() {
		return Err(format!("unexpected trailing input at column {}", p.pos + 1));
	}
	Ok(value)
}

struct LiteralParser<'a> {
	src: &'a [u8],
	pos: usize,
}

impl LiteralParser<'_> {
	fn peek(&self) -> Option<u8> {
		self.src.get(self.pos).copied()
	}

	fn skip_ws(&mut self) {
		while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
			self.pos += 1;
		}
	}

	fn value(&mut self) -> Result<Value, String> {
		self.skip_ws();
		match self.peek() {
			None => Err("empty value".to_string()),
			Some(b'[') => self.sequence(b']'),
			Some(b'(') => self.sequence(b')'),
			Some(q @ (b'"' | b'\'')) => self.string(q),
			Some(b'-' | b'+' | b'0'..=b'9') => self.integer(),
			Some(c) if c.is_ascii_alphabetic() => self.keyword(),
			Some(c) => Err(format!("unexpected character {:?} at column {}", c as char, self.pos + 1)),
		}
	}

	fn sequence(&mut self, close: u8) -> Result<Value, String> {
		self.pos += 1;
		let mut items = Vec::new();
		loop {
			self.skip_ws();
			if self.peek() == Some(close) {
				self.pos += 1;
				return Ok(Value::Array(items));
			}
			items.push(self.value()?);
			self.skip_ws();
			match self.peek() {
				Some(b',') => self.pos += 1,
				Some(c) if c == close => {}
				Some(c) => return Err(format!("expected ',' but found {:?}", c as char)),
				None => return Err(format!("unterminated sequence, expected {:?}", close as char)),
			}
		}
	}

	fn string(&mut self, quote: u8) -> Result<Value, String> {
		self.pos += 1;
		let mut out = Vec::new();
		while let Some(c) = self.peek() {
			self.pos += 1;
			match c {
				b'\\' => {
					let escaped = self.peek().ok_or("dangling escape")?;
					self.pos += 1;
					out.push(match escaped {
						b'n' => b'\n',
						b't' => b'\t',
						b'r' => b'\r',
						other => other,
					});
				}
				c if c == quote => {
					let s = String::from_utf8(out).map_err(|e| e.to_string())?;
					return Ok(Value::String(s));
				}
				c => out.push(c),
			}
		}
		Err("unterminated string".to_string())
	}

	fn integer(&mut self) -> Result<Value, String> {
		let start = self.pos;
		if matches!(self.peek(), Some(b'-' | b'+')) {
			self.pos += 1;
		}
		while matches!(self.peek(), Some(b'0'..=b'9' | b'_')) {
			self.pos += 1;
		}
		let text: String = self.src[start..self.pos]
			.iter()
			.filter(|&&b| b != b'_')
			.map(|&b| b as char)
			.collect();
		let n: i64 = text.parse().map_err(|_| format!("invalid integer {:?}", text))?;
		Ok(Value::from(n))
	}

	fn keyword(&mut self) -> Result<Value, String> {
		let start = self.pos;
		while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
			self.pos += 1;
		}
		match &self.src[start..self.pos] {
			b"True" => Ok(Value::Bool(true)),
			b"False" => Ok(Value::Bool(false)),
			b"None" => Ok(Value::Null),
			other => Err(format!("unknown name {:?}", String::from_utf8_lossy(other))),
		}
	}
}
