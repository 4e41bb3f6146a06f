//! IDF text: a flat list of objects, each an object type followed by
//! comma-separated fields and terminated by `;`. `!` starts a comment.

use std::fmt;
use std::str::FromStr;

use crate::error::IdfError;
use crate::fields;

const AUTOSIZE: &str = "Autosize";
const COMMENT_COLUMN: usize = 40;
/// Characters that end a field or start a comment.
const RESERVED: &[char] = &[',', ';', '!', '\n', '\r'];

// ---------------------------------------------------------------------------
// IdfObject
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct IdfObject {
    object_type: String,
    fields: Vec<String>,
}

impl IdfObject {
    pub fn new(object_type: &str) -> Self {
        Self { object_type: object_type.to_owned(), fields: Vec::new() }
    }

    /// New object with its name field set.
    pub fn named(object_type: &str, name: &str) -> Self {
        let mut obj = Self::new(object_type);
        obj.set(0, name);
        obj
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn is_type(&self, object_type: &str) -> bool {
        self.object_type.eq_ignore_ascii_case(object_type)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn name(&self) -> Option<&str> {
        self.get_string(0)
    }

    /// Field text, or `None` when the field is absent or blank.
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.fields
            .get(index)
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
    }

    /// Numeric field. Blank, absent and autosized fields read as `None`.
    ///
    /// # Errors
    /// [`IdfError::InvalidNumber`] if the text is not a number.
    pub fn get_f64(&self, index: usize) -> Result<Option<f64>, IdfError> {
        let Some(text) = self.get_string(index) else {
            return Ok(None);
        };
        if self.is_autosized(index) {
            return Ok(None);
        }
        text.parse::<f64>().map(Some).map_err(|_| IdfError::InvalidNumber {
            object_type: self.object_type.clone(),
            name: self.name().unwrap_or_default().to_owned(),
            field: fields::label(&self.object_type, index),
            value: text.to_owned(),
        })
    }

    pub fn is_autosized(&self, index: usize) -> bool {
        self.get_string(index)
            .is_some_and(|t| t.eq_ignore_ascii_case("autosize") || t.eq_ignore_ascii_case("autocalculate"))
    }

    /// Set field `index`, padding any gap with blank fields.
    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        if self.fields.len() <= index {
            self.fields.resize(index + 1, String::new());
        }
        self.fields[index] = value.into();
    }

    pub fn set_f64(&mut self, index: usize, value: f64) {
        self.set(index, value.to_string());
    }

    /// Write a value, or `Autosize` for `None`.
    pub fn set_autosizable(&mut self, index: usize, value: Option<f64>) {
        match value {
            Some(v) => self.set_f64(index, v),
            None => self.set(index, AUTOSIZE),
        }
    }

    pub fn set_bool(&mut self, index: usize, value: bool) {
        self.set(index, if value { "Yes" } else { "No" });
    }

    /// Append a field after the last one.
    pub fn push(&mut self, value: impl Into<String>) {
        self.fields.push(value.into());
    }

    /// Replace every reserved character with `_` so the printed text parses
    /// back to the same fields. Returns `(index, original)` for each field
    /// that changed.
    pub fn sanitize(&mut self) -> Vec<(usize, String)> {
        let mut changed = Vec::new();
        for (index, value) in self.fields.iter_mut().enumerate() {
            if value.contains(RESERVED) {
                let clean = value.replace(RESERVED, "_");
                changed.push((index, std::mem::replace(value, clean)));
            }
        }
        changed
    }
}

impl fmt::Display for IdfObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return writeln!(f, "{};", self.object_type);
        }
        writeln!(f, "{},", self.object_type)?;
        let last = self.fields.len() - 1;
        for (i, value) in self.fields.iter().enumerate() {
            let text = format!("  {value}{}", if i == last { ";" } else { "," });
            writeln!(
                f,
                "{text:<width$} !- {}",
                fields::label(&self.object_type, i),
                width = COMMENT_COLUMN
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// IdfFile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdfFile {
    objects: Vec<IdfObject>,
}

impl IdfFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: IdfObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[IdfObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects_of_type<'a>(&'a self, object_type: &str) -> impl Iterator<Item = &'a IdfObject> + 'a {
        let object_type = object_type.to_owned();
        self.objects.iter().filter(move |o| o.is_type(&object_type))
    }

    pub fn object_by_name(&self, object_type: &str, name: &str) -> Option<&IdfObject> {
        self.objects
            .iter()
            .find(|o| o.is_type(object_type) && o.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }

    /// Parse IDF text.
    ///
    /// # Errors
    /// [`IdfError::Parse`] for an object without a type or one that is not
    /// terminated by `;`.
    pub fn parse(text: &str) -> Result<Self, IdfError> {
        let mut file = IdfFile::new();
        let mut tokens: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut line = 1;
        let mut object_line = 1;
        let mut in_comment = false;

        for ch in text.chars() {
            if ch == '\n' {
                line += 1;
                in_comment = false;
                continue;
            }
            if in_comment {
                continue;
            }
            match ch {
                '!' => in_comment = true,
                ',' | ';' => {
                    if tokens.is_empty() && current.trim().is_empty() {
                        return Err(IdfError::Parse { line, message: "object has no type".into() });
                    }
                    tokens.push(current.trim().to_owned());
                    current.clear();
                    if ch == ';' {
                        let mut fields = std::mem::take(&mut tokens).into_iter();
                        let object_type = fields.next().unwrap_or_default();
                        file.add(IdfObject { object_type, fields: fields.collect() });
                    }
                }
                '\r' => {}
                _ => {
                    if tokens.is_empty() && current.trim().is_empty() && !ch.is_whitespace() {
                        object_line = line;
                    }
                    current.push(ch);
                }
            }
        }

        if !tokens.is_empty() || !current.trim().is_empty() {
            return Err(IdfError::Parse {
                line: object_line,
                message: "object is not terminated by ';'".into(),
            });
        }
        Ok(file)
    }
}

impl FromStr for IdfFile {
    type Err = IdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IdfFile::parse(s)
    }
}

impl fmt::Display for IdfFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, object) in self.objects.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{object}")?;
        }
        Ok(())
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
! comment line
SetpointManager:Scheduled,
  Deck SPM,                !- Name
  Temperature,             !- Control Variable
  Deck Temp,               !- Schedule Name
  Supply Outlet Node;      !- Setpoint Node or NodeList Name

Schedule:Constant,Deck Temp,Temperature,12.8;
";

    #[test]
    fn parses_objects_and_strips_comments() {
        let idf = IdfFile::parse(SAMPLE).unwrap();
        assert_eq!(idf.len(), 2);
        let spm = &idf.objects()[0];
        assert_eq!(spm.object_type(), "SetpointManager:Scheduled");
        assert_eq!(spm.name(), Some("Deck SPM"));
        assert_eq!(spm.get_string(3), Some("Supply Outlet Node"));
        let schedule = idf.object_by_name("schedule:constant", "deck temp").unwrap();
        assert_eq!(schedule.get_f64(2).unwrap(), Some(12.8));
    }

    #[test]
    fn lookups_outlive_the_type_name() {
        let idf = IdfFile::parse(SAMPLE).unwrap();
        let schedule = {
            let object_type = String::from("Schedule:Constant");
            idf.object_by_name(&object_type, "Deck Temp")
        };
        assert_eq!(schedule.and_then(|o| o.name()), Some("Deck Temp"));

        let managers: Vec<&IdfObject> = {
            let object_type = "setpointmanager:scheduled".to_owned();
            idf.objects_of_type(&object_type).collect()
        };
        assert_eq!(managers.len(), 1);
    }

    #[test]
    fn sanitize_replaces_separators_and_comment_marks() {
        let mut obj = IdfObject::named("Zone", "East, Core");
        obj.push("plain");
        obj.push("a;b!c");
        let changed = obj.sanitize();
        assert_eq!(changed, vec![(0, "East, Core".to_owned()), (2, "a;b!c".to_owned())]);
        assert_eq!(obj.fields(), &["East_ Core", "plain", "a_b_c"]);

        let reparsed = IdfFile::parse(&obj.to_string()).unwrap();
        assert_eq!(reparsed.objects(), &[obj]);
    }

    #[test]
    fn unterminated_object_reports_its_line() {
        let err = IdfFile::parse("Version,9.6;\n\nZone,\n  Core").unwrap_err();
        assert!(matches!(err, IdfError::Parse { line: 3, .. }));
    }

    #[test]
    fn blank_and_autosize_read_as_none() {
        let idf = IdfFile::parse("Fan:ConstantVolume,Fan,,0.7,250,Autosize,0.9,1,In,Out;").unwrap();
        let fan = &idf.objects()[0];
        assert_eq!(fan.get_f64(1).unwrap(), None);
        assert_eq!(fan.get_f64(4).unwrap(), None);
        assert!(fan.is_autosized(4));
        assert_eq!(fan.get_f64(3).unwrap(), Some(250.0));
        assert!(matches!(fan.get_f64(7), Err(IdfError::InvalidNumber { .. })));
    }

    #[test]
    fn printed_text_parses_back() {
        let mut obj = IdfObject::named("Pipe:Adiabatic", "Bypass");
        obj.set(2, "Bypass Outlet");
        obj.set(1, "Bypass Inlet");
        let mut idf = IdfFile::new();
        idf.add(obj.clone());

        let text = idf.to_string();
        assert!(text.contains("!- Inlet Node Name"));
        assert!(text.lines().nth(3).unwrap().starts_with("  Bypass Outlet;"));
        assert_eq!(IdfFile::parse(&text).unwrap().objects(), &[obj]);
    }
}
