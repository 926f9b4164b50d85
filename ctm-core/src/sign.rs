use std::ops::Neg;
use derive_more::{Display, Debug};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Orientation label of an orange strand.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Debug, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Sign { 
    #[display("+")]
    #[debug("+")]
    Pos,

    #[display("-")]
    #[debug("-")]
    Neg
}

impl Sign { 
    pub fn is_positive(&self) -> bool { 
        self == &Sign::Pos
    }

    pub fn is_negative(&self) -> bool { 
        !self.is_positive()
    }

    pub fn to_isize(self) -> isize { 
        match self { 
            Sign::Pos =>  1,
            Sign::Neg => -1
        }
    }

    pub fn parse_seq(s: &str) -> Result<Vec<Sign>> { 
        s.split(',')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| match t { 
                "1" | "+1" | "+" => Ok(Sign::Pos),
                "-1" | "-"       => Ok(Sign::Neg),
                _ => Err(Error::Parse(format!("invalid sign: {t}")))
            })
            .collect()
    }
}

impl TryFrom<i8> for Sign {
    type Error = Error;

    fn try_from(value: i8) -> Result<Self> {
        match value { 
             1 => Ok(Sign::Pos),
            -1 => Ok(Sign::Neg),
             _ => Err(Error::Parse(format!("invalid sign: {value}")))
        }
    }
}

impl From<Sign> for i8 {
    fn from(value: Sign) -> Self {
        value.to_isize() as i8
    }
}

impl Neg for Sign {
    type Output = Self;
    fn neg(self) -> Self {
        match self { 
            Sign::Neg => Sign::Pos,
            Sign::Pos => Sign::Neg
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_string() { 
        assert_eq!(&Sign::Neg.to_string(), "-");
        assert_eq!(&Sign::Pos.to_string(), "+");
    }

    #[test]
    fn parse_seq() { 
        assert_eq!(Sign::parse_seq("1,-1, 1"), Ok(vec![Sign::Pos, Sign::Neg, Sign::Pos]));
        assert!(Sign::parse_seq("1,2").is_err());
    }

    #[test]
    fn serialize() { 
        let ser = serde_json::to_string(&vec![Sign::Pos, Sign::Neg]).unwrap();
        assert_eq!(ser, "[1,-1]");

        let des: Vec<Sign> = serde_json::from_str(&ser).unwrap();
        assert_eq!(des, vec![Sign::Pos, Sign::Neg]);
        assert!(serde_json::from_str::<Sign>("0").is_err());
    }
}
