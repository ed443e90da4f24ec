//! Recursive descent parser for trace sources
//!
//! ```text
//! trace     := frame* EOF
//! frame     := "frame" ("*" INT)? "{" port* "}"
//! port      := "port" INT ":" ( "unplugged" | device | "hub" "{" tap* "}" )
//! tap       := device | "empty"
//! device    := "device" (INT | IDENT) field*
//! field     := "buttons" (INT | IDENT ("+" IDENT)*)
//!            | "axes" INT INT INT INT
//!            | "data" "{" INT* "}"
//! ```
//!
//! Fields apply left to right, so `data` replaces anything set before it.

use crate::common::{Span, TraceError, TraceResult};
use crate::lexer::{Lexer, TokenKind};
use crate::trace::{FrameSpec, Trace};
use smpc::bus::{DeviceInput, PortInput};
use smpc::input::{Button, Buttons};
use smpc::peripheral::DeviceType;
use smpc::types::{HUB_SLOTS, PAYLOAD_SIZE, PhysicalPort};
use std::fs;
use std::path::Path;

/// Parse a complete trace
pub fn parse(source: &str) -> TraceResult<Trace> {
    TraceParser::new(source).parse_trace()
}

/// Read a trace source from disk
pub fn read_source(path: impl AsRef<Path>) -> TraceResult<String> {
    Ok(fs::read_to_string(path)?)
}

/// Parser over a single trace source
pub struct TraceParser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> TraceParser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    pub fn parse_trace(&mut self) -> TraceResult<Trace> {
        let mut frames = Vec::new();
        while !self.lexer.check(&TokenKind::Eof)? {
            frames.push(self.parse_frame()?);
        }
        Ok(Trace { frames })
    }

    fn parse_frame(&mut self) -> TraceResult<FrameSpec> {
        let start = self.lexer.expect(TokenKind::Frame)?.span;

        let repeat = if self.lexer.match_token(&TokenKind::Star)? {
            let (count, span) = self.expect_integer()?;
            if count == 0 {
                return Err(TraceError::value("repeat count must be at least 1", span));
            }
            count
        } else {
            1
        };

        self.lexer.expect(TokenKind::LBrace)?;
        let mut ports: [Option<PortInput>; 2] = [None, None];
        while !self.lexer.check(&TokenKind::RBrace)? {
            let (port, input, span) = self.parse_port()?;
            let entry = &mut ports[port.index()];
            if entry.is_some() {
                return Err(TraceError::value(
                    format!("{} listed twice in one frame", port),
                    span,
                ));
            }
            *entry = Some(input);
        }
        let end = self.lexer.expect(TokenKind::RBrace)?.span;

        Ok(FrameSpec {
            repeat,
            ports: ports.map(Option::unwrap_or_default),
            span: start.to(end),
        })
    }

    fn parse_port(&mut self) -> TraceResult<(PhysicalPort, PortInput, Span)> {
        let start = self.lexer.expect(TokenKind::Port)?.span;
        let (number, number_span) = self.expect_integer()?;
        let port = u8::try_from(number)
            .ok()
            .and_then(PhysicalPort::from_number)
            .ok_or_else(|| {
                TraceError::value(format!("port must be 1 or 2, found {}", number), number_span)
            })?;
        self.lexer.expect(TokenKind::Colon)?;

        let token = self.lexer.peek()?.clone();
        let input = match token.kind {
            TokenKind::Unplugged => {
                self.lexer.next_token()?;
                PortInput::Unplugged
            }
            TokenKind::Device => PortInput::Direct(self.parse_device()?),
            TokenKind::Hub => {
                self.lexer.next_token()?;
                PortInput::Hub(self.parse_taps()?)
            }
            other => {
                return Err(TraceError::parser(
                    format!("expected 'unplugged', 'device' or 'hub', found {}", other),
                    token.span,
                ));
            }
        };

        Ok((port, input, start.to(number_span)))
    }

    fn parse_taps(&mut self) -> TraceResult<Vec<Option<DeviceInput>>> {
        self.lexer.expect(TokenKind::LBrace)?;
        let mut taps = Vec::new();
        while !self.lexer.check(&TokenKind::RBrace)? {
            let span = self.lexer.peek()?.span;
            let tap = if self.lexer.match_token(&TokenKind::Empty)? {
                None
            } else {
                Some(self.parse_device()?)
            };
            if taps.len() == HUB_SLOTS {
                return Err(TraceError::value(
                    format!("a multitap holds at most {} devices", HUB_SLOTS),
                    span,
                ));
            }
            taps.push(tap);
        }
        self.lexer.expect(TokenKind::RBrace)?;
        Ok(taps)
    }

    fn parse_device(&mut self) -> TraceResult<DeviceInput> {
        self.lexer.expect(TokenKind::Device)?;

        let token = self.lexer.next_token()?;
        let type_code = match token.kind {
            TokenKind::Integer(code) => to_byte(code, token.span)?,
            TokenKind::Identifier(name) => DeviceType::from_name(&name)
                .map(DeviceType::code)
                .ok_or_else(|| {
                    TraceError::value(format!("unknown device type '{}'", name), token.span)
                })?,
            other => {
                return Err(TraceError::parser(
                    format!("expected device type, found {}", other),
                    token.span,
                ));
            }
        };

        let mut device = DeviceInput::with_type_code(type_code);
        loop {
            if self.lexer.match_token(&TokenKind::Buttons)? {
                device = device.buttons(self.parse_buttons()?);
            } else if self.lexer.match_token(&TokenKind::Axes)? {
                let mut axes = [0u8; 4];
                for axis in &mut axes {
                    *axis = self.parse_byte()?;
                }
                device = device.axes(axes);
            } else if self.lexer.match_token(&TokenKind::Data)? {
                device = device.payload(&self.parse_data()?);
            } else {
                break;
            }
        }
        Ok(device)
    }

    fn parse_buttons(&mut self) -> TraceResult<Buttons> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Integer(word) => u16::try_from(word).map(Buttons).map_err(|_| {
                TraceError::value("button word must fit in 16 bits", token.span)
            }),
            TokenKind::Identifier(name) => {
                let mut buttons = button_named(&name, token.span)?;
                while self.lexer.match_token(&TokenKind::Plus)? {
                    let token = self.lexer.next_token()?;
                    match token.kind {
                        TokenKind::Identifier(name) => {
                            buttons = buttons | button_named(&name, token.span)?;
                        }
                        other => {
                            return Err(TraceError::parser(
                                format!("expected button name, found {}", other),
                                token.span,
                            ));
                        }
                    }
                }
                Ok(buttons)
            }
            other => Err(TraceError::parser(
                format!("expected button word or button names, found {}", other),
                token.span,
            )),
        }
    }

    fn parse_data(&mut self) -> TraceResult<Vec<u8>> {
        let start = self.lexer.expect(TokenKind::LBrace)?.span;
        let mut bytes = Vec::new();
        while !self.lexer.check(&TokenKind::RBrace)? {
            bytes.push(self.parse_byte()?);
        }
        let end = self.lexer.expect(TokenKind::RBrace)?.span;
        if bytes.len() > PAYLOAD_SIZE {
            return Err(TraceError::value(
                format!("payload holds at most {} bytes, found {}", PAYLOAD_SIZE, bytes.len()),
                start.to(end),
            ));
        }
        Ok(bytes)
    }

    fn parse_byte(&mut self) -> TraceResult<u8> {
        let (value, span) = self.expect_integer()?;
        to_byte(value, span)
    }

    fn expect_integer(&mut self) -> TraceResult<(u32, Span)> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Integer(value) => Ok((value, token.span)),
            other => Err(TraceError::parser(
                format!("expected integer, found {}", other),
                token.span,
            )),
        }
    }
}

fn to_byte(value: u32, span: Span) -> TraceResult<u8> {
    u8::try_from(value)
        .map_err(|_| TraceError::value(format!("{} does not fit in a byte", value), span))
}

fn button_named(name: &str, span: Span) -> TraceResult<Buttons> {
    if name.eq_ignore_ascii_case("none") {
        return Ok(Buttons::NONE);
    }
    Button::from_name(name)
        .map(Buttons::from)
        .ok_or_else(|| TraceError::value(format!("unknown button '{}'", name), span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn single_frame(source: &str) -> FrameSpec {
        let trace = parse(source).unwrap();
        assert_eq!(trace.frames.len(), 1);
        trace.frames.into_iter().next().unwrap()
    }

    fn value_error_span(source: &str) -> Span {
        match parse(source).unwrap_err() {
            TraceError::Value { span, .. } => span,
            other => panic!("expected value error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_trace() {
        assert_eq!(parse("// nothing here\n").unwrap(), Trace::default());
    }

    #[test]
    fn test_direct_device() {
        let frame = single_frame("frame { port 1: device gamepad buttons right+a }");

        assert_eq!(frame.repeat, 1);
        assert_eq!(
            frame.port(PhysicalPort::One),
            &PortInput::Direct(
                DeviceInput::new(DeviceType::Gamepad).buttons(Button::RIGHT | Button::A)
            )
        );
        assert_eq!(frame.port(PhysicalPort::Two), &PortInput::Unplugged);
    }

    #[test]
    fn test_hub_with_empty_tap() {
        let frame = single_frame(
            "frame * 3 {
                port 2: hub {
                    device 0x16 buttons 0x0000 axes 0x10 0x7f 0xff 0xff
                    empty
                    device gamepad
                }
            }",
        );

        assert_eq!(frame.repeat, 3);
        assert_eq!(
            frame.port(PhysicalPort::Two),
            &PortInput::Hub(vec![
                Some(DeviceInput::new(DeviceType::Analog3dPad).axes([0x10, 0x7F, 0xFF, 0xFF])),
                None,
                Some(DeviceInput::new(DeviceType::Gamepad)),
            ])
        );
    }

    #[test]
    fn test_raw_data_field() {
        let frame = single_frame("frame { port 1: device mouse data { 0x00 0x40 1 2 } }");
        match frame.port(PhysicalPort::One) {
            PortInput::Direct(device) => {
                assert_eq!(device.type_code, 0x23);
                assert_eq!(device.data, vec![0x00, 0x40, 1, 2]);
            }
            other => panic!("expected direct device, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_unplugged_and_none() {
        let trace = parse(
            "frame { port 1: unplugged port 2: device gamepad buttons none }
             frame { }",
        )
        .unwrap();

        assert_eq!(trace.frames.len(), 2);
        assert_eq!(trace.frames[0].port(PhysicalPort::One), &PortInput::Unplugged);
        assert_eq!(
            trace.frames[0].port(PhysicalPort::Two),
            &PortInput::Direct(DeviceInput::new(DeviceType::Gamepad).buttons(Buttons::NONE))
        );
        assert_eq!(trace.frames[1].ports, [PortInput::Unplugged, PortInput::Unplugged]);
    }

    #[test]
    fn test_frame_span() {
        let source = "  frame { }  ";
        let frame = single_frame(source);
        assert_eq!(&source[frame.span.start..frame.span.end], "frame { }");
    }

    #[test]
    fn test_rejects_bad_port() {
        let source = "frame { port 3: unplugged }";
        let span = value_error_span(source);
        assert_eq!(&source[span.start..span.end], "3");
    }

    #[test]
    fn test_rejects_duplicate_port() {
        let span = value_error_span("frame { port 1: unplugged port 1: unplugged }");
        assert_eq!(span, Span::new(26, 32));
    }

    #[test]
    fn test_rejects_oversized_hub() {
        let source = "frame { port 1: hub { empty empty empty empty empty empty device gun } }";
        let span = value_error_span(source);
        assert_eq!(&source[span.start..span.end], "device");
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let source = "frame { port 1: device gamepad buttons 0x10000 }";
        let span = value_error_span(source);
        assert_eq!(&source[span.start..span.end], "0x10000");

        let source = "frame { port 1: device 0x16 axes 1 2 3 256 }";
        let span = value_error_span(source);
        assert_eq!(&source[span.start..span.end], "256");
    }

    #[test]
    fn test_rejects_unknown_names() {
        let source = "frame { port 1: device joystick }";
        let span = value_error_span(source);
        assert_eq!(&source[span.start..span.end], "joystick");

        let source = "frame { port 1: device gamepad buttons a+select }";
        let span = value_error_span(source);
        assert_eq!(&source[span.start..span.end], "select");
    }

    #[test]
    fn test_rejects_zero_repeat() {
        let source = "frame * 0 { }";
        let span = value_error_span(source);
        assert_eq!(&source[span.start..span.end], "0");
    }

    #[test]
    fn test_read_missing_source() {
        let err = read_source("traces/does-not-exist.trace").unwrap_err();
        assert!(matches!(err, TraceError::Io(_)));
        assert_eq!(err.span(), None);
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(parse("frame {"), Err(TraceError::Parser { .. })));
        assert!(matches!(parse("port 1: unplugged"), Err(TraceError::Parser { .. })));
        assert!(matches!(parse("frame { port 1: buttons }"), Err(TraceError::Parser { .. })));
        assert!(matches!(parse("frame { port 1 unplugged }"), Err(TraceError::Parser { .. })));
    }
}
