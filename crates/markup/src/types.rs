/// Attribute as seen by the tokenizer: lowercased name, optional decoded value.
pub type Attribute = (String, Option<String>);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Doctype(String),
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag(String),
    Comment(String),
    Text(String),
}

/// Receiver for tokenizer events.
///
/// Both builders implement this, so any event source that can speak in
/// open/close/text terms can drive them.
pub trait TokenSink {
    fn start_tag(&mut self, name: &str, attributes: &[Attribute], self_closing: bool);

    fn end_tag(&mut self, name: &str);

    fn text(&mut self, text: &str);

    fn comment(&mut self, _text: &str) {}

    fn doctype(&mut self, _text: &str) {}
}

/// Token sink that buffers into a Vec.
pub struct VecTokenSink<'a>(pub &'a mut Vec<Token>);

impl<'a> TokenSink for VecTokenSink<'a> {
    fn start_tag(&mut self, name: &str, attributes: &[Attribute], self_closing: bool) {
        self.0.push(Token::StartTag {
            name: name.to_string(),
            attributes: attributes.to_vec(),
            self_closing,
        });
    }

    fn end_tag(&mut self, name: &str) {
        self.0.push(Token::EndTag(name.to_string()));
    }

    fn text(&mut self, text: &str) {
        self.0.push(Token::Text(text.to_string()));
    }

    fn comment(&mut self, text: &str) {
        self.0.push(Token::Comment(text.to_string()));
    }

    fn doctype(&mut self, text: &str) {
        self.0.push(Token::Doctype(text.to_string()));
    }
}

/// Replay already-collected tokens into a sink.
pub fn replay<S: TokenSink + ?Sized>(tokens: &[Token], sink: &mut S) {
    for token in tokens {
        match token {
            Token::Doctype(s) => sink.doctype(s),
            Token::Comment(s) => sink.comment(s),
            Token::Text(s) => sink.text(s),
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => sink.start_tag(name, attributes, *self_closing),
            Token::EndTag(name) => sink.end_tag(name),
        }
    }
}
