//! URI state machine.
//!
//! The parser folds over an explicit `(State, Components)` pair: each step
//! reads from the scanner, records at most one component and returns the next
//! state. It never fails; input it does not understand simply leaves
//! components unset.

use log::trace;

use crate::scanner::{Pattern, Scanner, UntilOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scheme,
    Host,
    Port,
    Path,
    Query,
    Finished,
}

/// Views into the input buffer, one per recognised component.
#[derive(Debug, Clone, Default)]
pub(crate) struct Components {
    pub(crate) scheme: Option<Scanner>,
    pub(crate) host: Option<Scanner>,
    pub(crate) port: Option<Scanner>,
    pub(crate) path: Option<Scanner>,
    pub(crate) query: Option<Scanner>,
}

const HOST_END: [char; 3] = [':', '/', '?'];
const PORT_END: [char; 2] = ['/', '?'];

pub(crate) fn parse(mut scanner: Scanner) -> Components {
    let mut state = if scanner.peek() == '/' {
        State::Path
    } else {
        State::Scheme
    };
    let mut components = Components::default();

    while state != State::Finished && !scanner.at_end() {
        let next = step(state, &mut scanner, &mut components);
        trace!("{state:?} -> {next:?} at byte {}", scanner.position());
        state = next;
    }
    components
}

fn step(state: State, scanner: &mut Scanner, components: &mut Components) -> State {
    match state {
        State::Scheme => {
            match scanner.take_until_with("://", UntilOptions::default().skip_to_end()) {
                Ok(scheme) => {
                    components.scheme = Some(scheme);
                    State::Host
                }
                Err(_) => State::Path,
            }
        }
        State::Host => {
            let host = take_or_rest(scanner, HOST_END);
            if !host.is_empty() {
                components.host = Some(host);
            }
            match scanner.peek() {
                ':' => State::Port,
                '?' => State::Query,
                _ => State::Path,
            }
        }
        // Host stopped on the ':'
        State::Port => {
            if scanner.eat(':') == Ok(true) {
                components.port = Some(take_or_rest(scanner, PORT_END));
            }
            State::Path
        }
        State::Path => {
            let path = take_or_rest(scanner, '?');
            if !path.is_empty() {
                components.path = Some(path);
            }
            State::Query
        }
        // Host or Path stopped on the '?'
        State::Query => {
            if scanner.eat('?') == Ok(true) {
                components.query = Some(take_or_rest(scanner, '#'));
            }
            State::Finished
        }
        State::Finished => State::Finished,
    }
}

/// Everything up to `stop`, or the rest of the input when it never appears.
fn take_or_rest<P: Pattern>(scanner: &mut Scanner, stop: P) -> Scanner {
    match scanner.take_until_with(stop, UntilOptions::remainder()) {
        Ok(span) => span,
        Err(_) => scanner.take_rest(),
    }
}
