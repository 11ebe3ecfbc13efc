use std::fmt;

const DISCOVERER_OPENING: &str = "深夜0時過ぎ、あなたは病棟を巡視中、病室で患者が倒れているのを発見しました。
呼びかけにも肩を叩いても反応がなく、呼吸も確認できません。
二人いる先輩看護師のうち、先輩看護師Aは休憩中、先輩看護師Bは巡視中でどこにいるかわかりません。

まず、どうしますか？";

const RESPONDER_OPENING: &str = "深夜0時過ぎ、あなたは病棟で記録作業をしていると、PHSから「ピロピロ」という緊急コールが鳴り響きました。
**先輩看護師B**からの、個室での急変を知らせる連絡です。

あなたが病室に駆けつけると、**先輩看護師B**が患者に胸骨圧迫を行っています。
患者の顔色は蒼白で、呼吸は確認できません。
先輩Bの額には汗が滲み、「来てくれたのね！助かる！AEDをお願いできる！？」と叫んでいます。先輩看護師Aは仮眠室で休憩中です。

まず、どうしますか？";

/// Which side of the arrest the player starts on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scenario {
    /// The player finds the patient alone.
    #[default]
    Discoverer,
    /// The player answers a colleague's emergency call.
    Responder,
}

impl Scenario {
    /// Picks a scenario from an optional selector, falling back to [`Scenario::Discoverer`]
    /// for missing or unknown values.
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector {
            Some("responder") => Self::Responder,
            _ => Self::Discoverer,
        }
    }

    /// Fixed opening narrative shown to the player.
    pub fn opening(&self) -> &'static str {
        match self {
            Self::Discoverer => DISCOVERER_OPENING,
            Self::Responder => RESPONDER_OPENING,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discoverer => write!(f, "discoverer"),
            Self::Responder => write!(f, "responder"),
        }
    }
}
