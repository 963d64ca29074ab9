use crate::arbitration::{DirectiveKind, TargetState};
use crate::error::{DecodeError, EncodeError};
use crate::geometry::{Direction, Location};
use crate::host::{AgentClass, AgentId};
use serde::{Deserialize, Serialize};

pub const ESTABLISH_LEADER_LABEL: &str = "establish-leader";
pub const LEADER_DIRECTIVE_LABEL: &str = "leader-directive";
pub const SCOUT_REPORT_LABEL: &str = "scout-report";

/// The shape the host transports. Only the comms boundary looks inside it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub label: String,
    pub sender: u32,
    #[serde(default)]
    pub locations: [Option<Location>; 2],
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub ints: Vec<i32>,
}

/// Claim (or rebroadcast of a claim) to lead a squad.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstablishLeader {
    pub sender: AgentId,
    pub leader: AgentId,
    pub squad: u32,
    /// Where the leader stood when it claimed. Rebroadcasts keep it.
    pub origin: Location,
    /// Followers that joined, in join order. The leader is not listed.
    pub members: Vec<AgentId>,
}

impl EstablishLeader {
    pub fn claim(leader: AgentId, squad: u32, origin: Location) -> EstablishLeader {
        EstablishLeader {
            sender: leader,
            leader,
            squad,
            origin,
            members: Vec::new(),
        }
    }

    pub fn member_count(&self) -> usize {
        1 + self.members.len()
    }

    /// Count `member` in and make it the sender of the rebroadcast.
    pub fn join(&mut self, member: AgentId) {
        if !self.members.contains(&member) {
            self.members.push(member);
        }
        self.sender = member;
    }
}

/// A squad objective as broadcast by a leader, or relayed by a member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    pub sender: AgentId,
    pub leader: AgentId,
    pub squad: u32,
    pub kind: DirectiveKind,
    /// Where the sender stood when it broadcast.
    pub origin: Location,
    pub target: TargetState,
    pub direction: Option<Direction>,
    pub finder: Option<AgentId>,
    pub spawn_needed: u32,
}

impl Directive {
    pub fn from_leader(&self) -> bool {
        self.sender == self.leader
    }

    /// Same directive, resent by `relay` from `origin`.
    pub fn relayed_by(&self, relay: AgentId, origin: Location) -> Directive {
        Directive {
            sender: relay,
            origin,
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutReport {
    pub sender: AgentId,
    pub leader: Option<AgentId>,
    pub origin: Location,
    pub target: Location,
    pub target_class: AgentClass,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Message {
    EstablishLeader(EstablishLeader),
    LeaderDirective(Directive),
    ScoutReport(ScoutReport),
}

impl Message {
    pub fn sender(&self) -> AgentId {
        match self {
            Message::EstablishLeader(m) => m.sender,
            Message::LeaderDirective(m) => m.sender,
            Message::ScoutReport(m) => m.sender,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Message::EstablishLeader(_) => ESTABLISH_LEADER_LABEL,
            Message::LeaderDirective(_) => LEADER_DIRECTIVE_LABEL,
            Message::ScoutReport(_) => SCOUT_REPORT_LABEL,
        }
    }

    /// Fails when an id or count is too large for the wire's signed integers.
    pub fn encode(&self) -> Result<WireMessage, EncodeError> {
        let wire = match self {
            Message::EstablishLeader(m) => {
                let mut ints = vec![
                    id_to_int(m.leader)?,
                    count_to_int("squad", m.squad)?,
                    count_to_int("count", m.member_count())?,
                ];
                for member in m.members.iter() {
                    ints.push(id_to_int(*member)?);
                }

                WireMessage {
                    label: ESTABLISH_LEADER_LABEL.to_string(),
                    sender: m.sender.0,
                    locations: [Some(m.origin), None],
                    direction: None,
                    ints,
                }
            }
            Message::LeaderDirective(m) => {
                let (target_code, target_location) = match m.target {
                    TargetState::Unknown => (0, None),
                    TargetState::Hostile(location) => (1, Some(location)),
                    TargetState::Captured(location) => (2, Some(location)),
                };

                WireMessage {
                    label: LEADER_DIRECTIVE_LABEL.to_string(),
                    sender: m.sender.0,
                    locations: [Some(m.origin), target_location],
                    direction: m.direction.map(|d| d.to_string()),
                    ints: vec![
                        id_to_int(m.leader)?,
                        count_to_int("squad", m.squad)?,
                        m.kind.code(),
                        m.finder.map(id_to_int).transpose()?.unwrap_or(0),
                        count_to_int("spawn_needed", m.spawn_needed)?,
                        target_code,
                    ],
                }
            }
            Message::ScoutReport(m) => WireMessage {
                label: SCOUT_REPORT_LABEL.to_string(),
                sender: m.sender.0,
                locations: [Some(m.origin), Some(m.target)],
                direction: None,
                ints: vec![m.leader.map(id_to_int).transpose()?.unwrap_or(0), m.target_class.code()],
            },
        };

        Ok(wire)
    }

    pub fn decode(wire: &WireMessage) -> Result<Message, DecodeError> {
        match wire.label.as_str() {
            ESTABLISH_LEADER_LABEL => decode_establish_leader(wire).map(Message::EstablishLeader),
            LEADER_DIRECTIVE_LABEL => decode_directive(wire).map(Message::LeaderDirective),
            SCOUT_REPORT_LABEL => decode_scout_report(wire).map(Message::ScoutReport),
            other => Err(DecodeError::UnknownLabel(other.to_string())),
        }
    }
}

impl TryFrom<&Message> for WireMessage {
    type Error = EncodeError;

    fn try_from(message: &Message) -> Result<WireMessage, EncodeError> {
        message.encode()
    }
}

impl TryFrom<&WireMessage> for Message {
    type Error = DecodeError;

    fn try_from(wire: &WireMessage) -> Result<Message, DecodeError> {
        Message::decode(wire)
    }
}

fn id_to_int(id: AgentId) -> Result<i32, EncodeError> {
    i32::try_from(id.0).map_err(|_| EncodeError::IdOutOfRange(id))
}

fn count_to_int<T>(field: &'static str, value: T) -> Result<i32, EncodeError>
where
    T: Copy + TryInto<i32> + ToString,
{
    value.try_into().map_err(|_| EncodeError::FieldOutOfRange {
        field,
        value: value.to_string(),
    })
}

fn int_field(wire: &WireMessage, label: &'static str, index: usize, field: &'static str) -> Result<i32, DecodeError> {
    wire.ints.get(index).copied().ok_or(DecodeError::MissingField { label, field })
}

fn unsigned_field(wire: &WireMessage, label: &'static str, index: usize, field: &'static str) -> Result<u32, DecodeError> {
    let value = int_field(wire, label, index, field)?;

    u32::try_from(value).map_err(|_| DecodeError::InvalidField {
        label,
        field,
        value: value.to_string(),
    })
}

/// Zero means "nobody".
fn optional_id_field(wire: &WireMessage, label: &'static str, index: usize, field: &'static str) -> Result<Option<AgentId>, DecodeError> {
    let value = unsigned_field(wire, label, index, field)?;

    Ok(if value == 0 { None } else { Some(AgentId(value)) })
}

fn id_field(wire: &WireMessage, label: &'static str, index: usize, field: &'static str) -> Result<AgentId, DecodeError> {
    optional_id_field(wire, label, index, field)?.ok_or(DecodeError::InvalidField {
        label,
        field,
        value: "0".to_string(),
    })
}

fn location_field(wire: &WireMessage, label: &'static str, index: usize, field: &'static str) -> Result<Location, DecodeError> {
    wire.locations[index].ok_or(DecodeError::MissingField { label, field })
}

fn decode_establish_leader(wire: &WireMessage) -> Result<EstablishLeader, DecodeError> {
    const LABEL: &str = ESTABLISH_LEADER_LABEL;

    let leader = id_field(wire, LABEL, 0, "leader")?;
    let squad = unsigned_field(wire, LABEL, 1, "squad")?;
    let count = unsigned_field(wire, LABEL, 2, "count")? as usize;

    let members = wire
        .ints
        .iter()
        .skip(3)
        .map(|&id| {
            u32::try_from(id).ok().filter(|id| *id != 0).map(AgentId).ok_or(DecodeError::InvalidField {
                label: LABEL,
                field: "members",
                value: id.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if count != members.len() + 1 {
        return Err(DecodeError::InvalidField {
            label: LABEL,
            field: "count",
            value: count.to_string(),
        });
    }

    Ok(EstablishLeader {
        sender: AgentId(wire.sender),
        leader,
        squad,
        origin: location_field(wire, LABEL, 0, "origin")?,
        members,
    })
}

fn decode_directive(wire: &WireMessage) -> Result<Directive, DecodeError> {
    const LABEL: &str = LEADER_DIRECTIVE_LABEL;

    let leader = id_field(wire, LABEL, 0, "leader")?;
    let squad = unsigned_field(wire, LABEL, 1, "squad")?;
    let kind_code = int_field(wire, LABEL, 2, "kind")?;
    let kind = DirectiveKind::from_code(kind_code).ok_or(DecodeError::InvalidField {
        label: LABEL,
        field: "kind",
        value: kind_code.to_string(),
    })?;
    let finder = optional_id_field(wire, LABEL, 3, "finder")?;
    let spawn_needed = unsigned_field(wire, LABEL, 4, "spawn_needed")?;
    let target = match int_field(wire, LABEL, 5, "target_state")? {
        0 => TargetState::Unknown,
        1 => TargetState::Hostile(location_field(wire, LABEL, 1, "target")?),
        2 => TargetState::Captured(location_field(wire, LABEL, 1, "target")?),
        other => {
            return Err(DecodeError::InvalidField {
                label: LABEL,
                field: "target_state",
                value: other.to_string(),
            })
        }
    };
    let direction = wire
        .direction
        .as_deref()
        .map(|raw| {
            raw.parse::<Direction>().map_err(|_| DecodeError::InvalidField {
                label: LABEL,
                field: "direction",
                value: raw.to_string(),
            })
        })
        .transpose()?;

    Ok(Directive {
        sender: AgentId(wire.sender),
        leader,
        squad,
        kind,
        origin: location_field(wire, LABEL, 0, "origin")?,
        target,
        direction,
        finder,
        spawn_needed,
    })
}

fn decode_scout_report(wire: &WireMessage) -> Result<ScoutReport, DecodeError> {
    const LABEL: &str = SCOUT_REPORT_LABEL;

    let class_code = int_field(wire, LABEL, 1, "target_class")?;

    Ok(ScoutReport {
        sender: AgentId(wire.sender),
        leader: optional_id_field(wire, LABEL, 0, "leader")?,
        origin: location_field(wire, LABEL, 0, "origin")?,
        target: location_field(wire, LABEL, 1, "target")?,
        target_class: AgentClass::from_code(class_code).ok_or(DecodeError::InvalidField {
            label: LABEL,
            field: "target_class",
            value: class_code.to_string(),
        })?,
    })
}
