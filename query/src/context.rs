//! Translation of the entity taxonomy path into context and tag prefixes.
//!
//! The taxonomy segments follow the scope and come in `<kind>/<id>` pairs:
//!
//! ```text
//! [datasets|streams/<id>] apps/<app> [flows/<flow> [flowlets/<flowlet> [queues/<queue>]]
//!                                    |mapreduce/<job> [mappers|reducers]
//!                                    |procedures/<proc>]
//! ```
//!
//! Each kind contributes its abbreviation to the context prefix, and each id
//! contributes itself, giving prefixes such as `app1.f.flow1.flowlet1` or
//! `app1.b.job1.m`. A kind token with no following id ends the path at that
//! level. Dataset, stream and queue ids become the tag prefix instead.

use crate::error::{ParseError, Result};

/// Entity kinds of the application taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EntityKind {
    Application,
    Flow,
    Flowlet,
    MapReduce,
    Mapper,
    Reducer,
    Procedure,
}

impl EntityKind {
    pub(crate) fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "apps" => Some(EntityKind::Application),
            "flows" => Some(EntityKind::Flow),
            "flowlets" => Some(EntityKind::Flowlet),
            "mapreduce" => Some(EntityKind::MapReduce),
            "mappers" => Some(EntityKind::Mapper),
            "reducers" => Some(EntityKind::Reducer),
            "procedures" => Some(EntityKind::Procedure),
            _ => None,
        }
    }

    pub(crate) fn segment(self) -> &'static str {
        match self {
            EntityKind::Application => "apps",
            EntityKind::Flow => "flows",
            EntityKind::Flowlet => "flowlets",
            EntityKind::MapReduce => "mapreduce",
            EntityKind::Mapper => "mappers",
            EntityKind::Reducer => "reducers",
            EntityKind::Procedure => "procedures",
        }
    }

    /// Token this kind contributes to the context prefix.
    ///
    /// Applications and flowlets contribute only their id.
    pub(crate) fn abbreviation(self) -> Option<&'static str> {
        match self {
            EntityKind::Application => None,
            EntityKind::Flow => Some("f"),
            EntityKind::Flowlet => None,
            EntityKind::MapReduce => Some("b"),
            EntityKind::Mapper => Some("m"),
            EntityKind::Reducer => Some("r"),
            EntityKind::Procedure => Some("p"),
        }
    }
}

/// Secondary dimensions carried in the tag prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TagKind {
    Dataset,
    Stream,
    Queue,
}

impl TagKind {
    pub(crate) fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "datasets" => Some(TagKind::Dataset),
            "streams" => Some(TagKind::Stream),
            "queues" => Some(TagKind::Queue),
            _ => None,
        }
    }

    pub(crate) fn segment(self) -> &'static str {
        match self {
            TagKind::Dataset => "datasets",
            TagKind::Stream => "streams",
            TagKind::Queue => "queues",
        }
    }

    /// Whether this dimension may lead the taxonomy path, ahead of `apps`.
    fn is_leading(self) -> bool {
        matches!(self, TagKind::Dataset | TagKind::Stream)
    }
}

/// Result of walking the taxonomy path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ContextPath {
    pub(crate) context_prefix: Option<String>,
    pub(crate) tag_prefix: Option<String>,
}

/// Builds the context and tag prefixes from the decoded segments that follow
/// the scope.
pub(crate) fn build_context(segments: &[String]) -> Result<ContextPath> {
    let mut walker = TaxonomyWalker::new(segments);
    walker.leading_tag()?;
    walker.application()?;
    walker.finish()
}

struct TaxonomyWalker<'a> {
    segments: &'a [String],
    pos: usize,
    parts: Vec<&'a str>,
    tag: Option<&'a str>,
}

impl<'a> TaxonomyWalker<'a> {
    fn new(segments: &'a [String]) -> Self {
        Self {
            segments,
            pos: 0,
            parts: Vec::new(),
            tag: None,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.segments.get(self.pos).map(String::as_str)
    }

    fn next_segment(&mut self) -> Option<&'a str> {
        let segment = self.peek();
        if segment.is_some() {
            self.pos += 1;
        }
        segment
    }

    /// Consumes the next segment if it is the token for `kind`.
    fn accept(&mut self, kind: EntityKind) -> bool {
        if self.peek() == Some(kind.segment()) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Records a consumed kind token and, when present, the id that follows.
    ///
    /// Returns `false` when the path ends before the id. Ids that would leave
    /// an empty component in the context prefix are rejected.
    fn entity(&mut self, kind: EntityKind) -> Result<bool> {
        if let Some(abbreviation) = kind.abbreviation() {
            self.parts.push(abbreviation);
        }
        let Some(id) = self.next_segment() else {
            return Ok(false);
        };
        if id.split('.').any(str::is_empty) {
            return Err(ParseError::MalformedPath(format!(
                "{} id '{}' has an empty dot-separated component",
                kind.segment(),
                id
            )));
        }
        self.parts.push(id);
        Ok(true)
    }

    fn leading_tag(&mut self) -> Result<()> {
        let Some(kind) = self
            .peek()
            .and_then(TagKind::from_segment)
            .filter(|kind| kind.is_leading())
        else {
            return Ok(());
        };
        self.pos += 1;

        let id = self.next_segment().ok_or_else(|| {
            ParseError::MalformedPath(format!("'{}' must be followed by an id", kind.segment()))
        })?;
        self.tag = Some(id);

        match self.peek() {
            None => Ok(()),
            Some(next) if next == EntityKind::Application.segment() => Ok(()),
            Some(next) => Err(ParseError::MalformedPath(format!(
                "expected 'apps' after '{}/{}', found '{}'",
                kind.segment(),
                id,
                next
            ))),
        }
    }

    fn application(&mut self) -> Result<()> {
        let Some(segment) = self.peek() else {
            return Ok(());
        };
        if !self.accept(EntityKind::Application) {
            return Err(ParseError::MalformedPath(format!(
                "expected 'apps', 'datasets' or 'streams', found '{}'",
                segment
            )));
        }
        if !self.entity(EntityKind::Application)? {
            return Ok(());
        }

        let Some(segment) = self.next_segment() else {
            return Ok(());
        };
        match EntityKind::from_segment(segment) {
            Some(EntityKind::Flow) => self.flow(),
            Some(EntityKind::MapReduce) => self.mapreduce(),
            Some(EntityKind::Procedure) => self.entity(EntityKind::Procedure).map(|_| ()),
            _ => Err(unexpected_segment(segment, "'flows', 'mapreduce' or 'procedures'")),
        }
    }

    fn flow(&mut self) -> Result<()> {
        if !self.entity(EntityKind::Flow)? {
            return Ok(());
        }
        if !self.accept(EntityKind::Flowlet) || !self.entity(EntityKind::Flowlet)? {
            return Ok(());
        }
        if self.peek() != Some(TagKind::Queue.segment()) {
            return Ok(());
        }
        self.pos += 1;

        let Some(queue) = self.next_segment() else {
            return Ok(());
        };
        if let Some(existing) = self.tag {
            return Err(ParseError::MalformedPath(format!(
                "queue '{}' conflicts with tag '{}'",
                queue, existing
            )));
        }
        self.tag = Some(queue);
        Ok(())
    }

    fn mapreduce(&mut self) -> Result<()> {
        if !self.entity(EntityKind::MapReduce)? {
            return Ok(());
        }
        for stage in [EntityKind::Mapper, EntityKind::Reducer] {
            if self.accept(stage) {
                self.parts.extend(stage.abbreviation());
                break;
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<ContextPath> {
        if let Some(segment) = self.peek() {
            return Err(unexpected_segment(segment, "end of path"));
        }
        let context_prefix = (!self.parts.is_empty()).then(|| self.parts.join("."));
        Ok(ContextPath {
            context_prefix,
            tag_prefix: self.tag.map(str::to_string),
        })
    }
}

fn unexpected_segment(segment: &str, expected: &str) -> ParseError {
    ParseError::MalformedPath(format!("unexpected segment '{}', expected {}", segment, expected))
}
