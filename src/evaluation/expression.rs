//! Expression collaborator used by MVEL data values and reference mappings.
//!
//! The engine treats expressions as opaque: anything implementing
//! [`ExpressionEvaluator`] can be plugged in. [`PathExpressionEvaluator`] is a
//! small bundled evaluator for variable paths, literals and `+` concatenation:
//!
//! ```text
//! arrayObj
//! arrayObj.displayedName
//! idsByType['email'][0]
//! 'urn:example:' + attr['employeeNumber']
//! ```

use super::context::{ContextKey, EvaluatorContext};
use super::converter::AttributeValueConverter;
use crate::error::{ExpressionError, MappingError, MappingResult};
use crate::model::{DataObject, User, UserAttribute};
use log::warn;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Evaluates expressions against an [`EvaluatorContext`].
pub trait ExpressionEvaluator: Send + Sync {
    /// Evaluate `expression`; `Ok(None)` means the expression produced no value.
    fn evaluate(
        &self,
        expression: &str,
        context: &EvaluatorContext<'_>,
    ) -> Result<Option<DataObject>, ExpressionError>;
}

/// Evaluate an expression for an attribute, attaching the attribute and
/// expression to any failure.
pub(crate) fn evaluate_for_attribute(
    evaluator: &dyn ExpressionEvaluator,
    attribute: &str,
    expression: &str,
    context: &EvaluatorContext<'_>,
) -> MappingResult<Option<DataObject>> {
    evaluator
        .evaluate(expression, context)
        .map_err(|source| MappingError::Expression {
            attribute: attribute.to_string(),
            expression: expression.to_string(),
            source,
        })
}

/// Value of one expression variable, `None` when the variable is unset.
///
/// Attributes whose values cannot be converted are left out of `attrObj`;
/// the other entries are still available.
pub fn context_variable(
    key: ContextKey,
    context: &EvaluatorContext<'_>,
    value_converter: &dyn AttributeValueConverter,
) -> Option<DataObject> {
    let user = context.user();
    match key {
        ContextKey::IdsByType => {
            let mut ids_by_type: BTreeMap<String, Vec<DataObject>> = BTreeMap::new();
            for identity in &user.identities {
                ids_by_type
                    .entry(identity.type_id.clone())
                    .or_default()
                    .push(DataObject::String(identity.value.clone()));
            }
            Some(DataObject::Map(
                ids_by_type
                    .into_iter()
                    .map(|(type_id, values)| (type_id, DataObject::List(values)))
                    .collect(),
            ))
        }
        ContextKey::Attr => Some(DataObject::Map(
            distinct_attributes(user)
                .filter_map(|attribute| {
                    let first = attribute.values.first()?;
                    Some((attribute.name.clone(), DataObject::String(first.clone())))
                })
                .collect(),
        )),
        ContextKey::Attrs => Some(DataObject::Map(
            distinct_attributes(user)
                .map(|attribute| {
                    let values = attribute.values.iter().cloned().map(DataObject::String).collect();
                    (attribute.name.clone(), DataObject::List(values))
                })
                .collect(),
        )),
        ContextKey::AttrObj => Some(DataObject::Map(
            distinct_attributes(user)
                .filter_map(|attribute| {
                    match value_converter.internal_values_to_objects(attribute) {
                        Ok(objects) => Some((attribute.name.clone(), DataObject::List(objects))),
                        Err(e) => {
                            warn!("Leaving attribute '{}' out of attrObj: {}", attribute.name, e);
                            None
                        }
                    }
                })
                .collect(),
        )),
        ContextKey::Groups => Some(DataObject::List(
            user.group_paths().map(DataObject::String).collect(),
        )),
        ContextKey::GroupsObj => Some(DataObject::Map(
            user.group_paths()
                .filter_map(|path| {
                    let group = context.group_provider().get(&path)?;
                    Some((path, DataObject::Group(group)))
                })
                .collect(),
        )),
        ContextKey::ArrayObj => context.array_obj().cloned(),
    }
}

/// Build every named variable exposed to expressions (see [`ContextKey`]).
pub fn context_variables(
    context: &EvaluatorContext<'_>,
    value_converter: &dyn AttributeValueConverter,
) -> BTreeMap<String, DataObject> {
    ContextKey::ALL
        .into_iter()
        .filter_map(|key| {
            context_variable(key, context, value_converter)
                .map(|value| (key.name().to_string(), value))
        })
        .collect()
}

/// First attribute of every name, in stored order.
fn distinct_attributes(user: &User) -> impl Iterator<Item = &UserAttribute> + '_ {
    let mut seen = HashSet::new();
    user.attributes
        .iter()
        .filter(move |attribute| seen.insert(attribute.name.as_str()))
}

/// Bundled evaluator for variable paths, literals and concatenation.
#[derive(Clone)]
pub struct PathExpressionEvaluator {
    value_converter: Arc<dyn AttributeValueConverter>,
}

impl PathExpressionEvaluator {
    pub fn new(value_converter: Arc<dyn AttributeValueConverter>) -> Self {
        Self { value_converter }
    }
}

impl std::fmt::Debug for PathExpressionEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathExpressionEvaluator").finish_non_exhaustive()
    }
}

impl ExpressionEvaluator for PathExpressionEvaluator {
    fn evaluate(
        &self,
        expression: &str,
        context: &EvaluatorContext<'_>,
    ) -> Result<Option<DataObject>, ExpressionError> {
        let parsed = parse(expression)?;
        let mut variables = BTreeMap::new();
        for key in parsed.roots().filter_map(ContextKey::from_name) {
            if variables.contains_key(key.name()) {
                continue;
            }
            if let Some(value) = context_variable(key, context, self.value_converter.as_ref()) {
                variables.insert(key.name().to_string(), value);
            }
        }
        parsed.evaluate(&variables)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    Dot,
    LBracket,
    RBracket,
    Plus,
}

fn tokenize(expression: &str) -> Result<Vec<(usize, Token)>, ExpressionError> {
    let chars: Vec<(usize, char)> = expression.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (position, c) = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '.' => {
                tokens.push((position, Token::Dot));
                i += 1;
            }
            '[' => {
                tokens.push((position, Token::LBracket));
                i += 1;
            }
            ']' => {
                tokens.push((position, Token::RBracket));
                i += 1;
            }
            '+' => {
                tokens.push((position, Token::Plus));
                i += 1;
            }
            '\'' | '"' => {
                let quote = c;
                let mut literal = String::new();
                i += 1;
                loop {
                    match chars.get(i) {
                        Some((_, '\\')) => {
                            if let Some((_, escaped)) = chars.get(i + 1) {
                                literal.push(*escaped);
                            }
                            i += 2;
                        }
                        Some((_, ch)) if *ch == quote => {
                            i += 1;
                            break;
                        }
                        Some((_, ch)) => {
                            literal.push(*ch);
                            i += 1;
                        }
                        None => {
                            return Err(ExpressionError::Syntax {
                                position,
                                message: "unterminated string literal".to_string(),
                            });
                        }
                    }
                }
                tokens.push((position, Token::Str(literal)));
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while chars.get(i).is_some_and(|(_, d)| d.is_ascii_digit()) {
                    i += 1;
                }
                let digits: String = chars[start..i].iter().map(|(_, d)| *d).collect();
                let value = digits.parse::<i64>().map_err(|e| ExpressionError::Syntax {
                    position,
                    message: e.to_string(),
                })?;
                tokens.push((position, Token::Int(value)));
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let start = i;
                while chars
                    .get(i)
                    .is_some_and(|(_, d)| d.is_alphanumeric() || *d == '_' || *d == '$')
                {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().map(|(_, d)| *d).collect();
                tokens.push((position, Token::Ident(ident)));
            }
            other => {
                return Err(ExpressionError::Syntax {
                    position,
                    message: format!("unexpected character '{}'", other),
                });
            }
        }
    }

    Ok(tokens)
}

#[derive(Debug, Clone, PartialEq)]
enum Accessor {
    Member(String),
    Key(String),
    Index(i64),
}

#[derive(Debug, Clone, PartialEq)]
enum Term {
    Literal(Option<DataObject>),
    Path { root: String, accessors: Vec<Accessor> },
}

#[derive(Debug, Clone, PartialEq)]
struct Expression {
    terms: Vec<Term>,
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    position: usize,
    end: usize,
}

fn parse(expression: &str) -> Result<Expression, ExpressionError> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser {
        tokens,
        position: 0,
        end: expression.len(),
    };
    parser.expression()
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|(_, token)| token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.position)
            .map(|(offset, _)| *offset)
            .unwrap_or(self.end)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).map(|(_, token)| token.clone());
        self.position += 1;
        token
    }

    fn syntax_error(&self, message: impl Into<String>) -> ExpressionError {
        ExpressionError::Syntax {
            position: self.offset(),
            message: message.into(),
        }
    }

    fn expression(&mut self) -> Result<Expression, ExpressionError> {
        let mut terms = vec![self.term()?];
        while self.peek() == Some(&Token::Plus) {
            self.next();
            terms.push(self.term()?);
        }
        if self.peek().is_some() {
            return Err(self.syntax_error("unexpected trailing input"));
        }
        Ok(Expression { terms })
    }

    fn term(&mut self) -> Result<Term, ExpressionError> {
        let offset = self.offset();
        match self.next() {
            Some(Token::Str(s)) => Ok(Term::Literal(Some(DataObject::String(s)))),
            Some(Token::Int(i)) => Ok(Term::Literal(Some(DataObject::Integer(i)))),
            Some(Token::Ident(ident)) => {
                let accessors = self.accessors()?;
                match (ident.as_str(), accessors.is_empty()) {
                    ("true", true) => Ok(Term::Literal(Some(DataObject::Boolean(true)))),
                    ("false", true) => Ok(Term::Literal(Some(DataObject::Boolean(false)))),
                    ("null", true) => Ok(Term::Literal(None)),
                    _ => Ok(Term::Path {
                        root: ident,
                        accessors,
                    }),
                }
            }
            Some(_) => Err(ExpressionError::Syntax {
                position: offset,
                message: "expected a literal or a variable".to_string(),
            }),
            None => Err(ExpressionError::Syntax {
                position: offset,
                message: "unexpected end of expression".to_string(),
            }),
        }
    }

    fn accessors(&mut self) -> Result<Vec<Accessor>, ExpressionError> {
        let mut accessors = Vec::new();
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.next();
                    match self.next() {
                        Some(Token::Ident(member)) => accessors.push(Accessor::Member(member)),
                        _ => return Err(self.syntax_error("expected member name after '.'")),
                    }
                }
                Some(Token::LBracket) => {
                    self.next();
                    let accessor = match self.next() {
                        Some(Token::Str(key)) => Accessor::Key(key),
                        Some(Token::Int(index)) => Accessor::Index(index),
                        _ => return Err(self.syntax_error("expected string key or index")),
                    };
                    if self.next() != Some(Token::RBracket) {
                        return Err(self.syntax_error("expected ']'"));
                    }
                    accessors.push(accessor);
                }
                _ => return Ok(accessors),
            }
        }
    }
}

impl Expression {
    /// Root variable names referenced by the expression.
    fn roots(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.iter().filter_map(|term| match term {
            Term::Path { root, .. } => Some(root.as_str()),
            Term::Literal(_) => None,
        })
    }

    fn evaluate(
        &self,
        variables: &BTreeMap<String, DataObject>,
    ) -> Result<Option<DataObject>, ExpressionError> {
        if let [single] = self.terms.as_slice() {
            return single.evaluate(variables);
        }

        let mut concatenated: Option<String> = None;
        for term in &self.terms {
            if let Some(value) = term.evaluate(variables)? {
                let text = value.to_text().ok_or(ExpressionError::InvalidAccess {
                    member: "+".to_string(),
                    value_type: value.type_name(),
                })?;
                concatenated.get_or_insert_with(String::new).push_str(&text);
            }
        }
        Ok(concatenated.map(DataObject::String))
    }
}

impl Term {
    fn evaluate(
        &self,
        variables: &BTreeMap<String, DataObject>,
    ) -> Result<Option<DataObject>, ExpressionError> {
        match self {
            Term::Literal(value) => Ok(value.clone()),
            Term::Path { root, accessors } => {
                let mut current = match variables.get(root) {
                    Some(value) => Some(value.clone()),
                    None if ContextKey::from_name(root).is_some() => None,
                    None => return Err(ExpressionError::UnknownVariable(root.clone())),
                };
                for accessor in accessors {
                    current = match current {
                        Some(value) => access(value, accessor)?,
                        None => return Ok(None),
                    };
                }
                Ok(current)
            }
        }
    }
}

fn access(value: DataObject, accessor: &Accessor) -> Result<Option<DataObject>, ExpressionError> {
    match (value, accessor) {
        (DataObject::Map(mut entries), Accessor::Member(key) | Accessor::Key(key)) => {
            Ok(entries.remove(key))
        }
        (DataObject::List(values), Accessor::Index(index)) => Ok(usize::try_from(*index)
            .ok()
            .and_then(|i| values.into_iter().nth(i))),
        (DataObject::List(values), Accessor::Member(member)) if member == "size" => {
            Ok(Some(DataObject::Integer(values.len() as i64)))
        }
        (DataObject::Group(group), Accessor::Member(member) | Accessor::Key(member)) => {
            match member.as_str() {
                "path" => Ok(Some(DataObject::String(group.path.clone()))),
                "name" => Ok(Some(DataObject::String(group.name().to_string()))),
                "displayedName" => Ok(group.displayed_name.clone().map(DataObject::String)),
                "parentPath" => Ok(group.parent_path().map(DataObject::String)),
                _ => Err(ExpressionError::InvalidAccess {
                    member: member.clone(),
                    value_type: "group",
                }),
            }
        }
        (value, accessor) => Err(ExpressionError::InvalidAccess {
            member: match accessor {
                Accessor::Member(member) | Accessor::Key(member) => member.clone(),
                Accessor::Index(index) => index.to_string(),
            },
            value_type: value.type_name(),
        }),
    }
}
