use rand::prelude::IndexedRandom;
use serde::Serialize;

/// A named ciphertext, encoded with shift 3.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sample {
	pub name: &'static str,
	pub ciphertext: &'static str,
}

/// Built-in samples for trying the decoder without input of one's own.
pub const SAMPLES: [Sample; 5] = [
	Sample {
		name: "Classic Quote",
		ciphertext: "WKH TXLFN EURZQ IRA MXPSV RYHU WKH ODCB GRJ. FDHVDU FLSKHU LV RQH RI WKH VLPSOHVW DQG PRVW ZLGHOB NQRZQ HQFUBSWLRQ WHFKQLTXHV.",
	},
	Sample {
		name: "Shakespeare",
		ciphertext: "WR EH RU QRW WR EH WKDW LV WKH TXHVWLRQ ZKHWKHU WLV QREOHU LQ WKH PLQG WR VXIIHU WKH VOLQJV DQG DUURZV",
	},
	Sample {
		name: "Declaration",
		ciphertext: "ZH KROG WKHVH WUXWKV WR EH VHOI HYLGHQW WKDW DOO PHQ DUH FUHDWHG HTXDO WKDW WKHB DUH HQGRZHG EB WKHLU FUHDWRU",
	},
	Sample {
		name: "Tech Quote",
		ciphertext: "FRPSXWHUV DUH LQFUHGLEBO IDVW DFFXUDWH DQG VWXSLG KXPDQV DUH LQFUHGLEBO VORZ LQDFFXUDWH DQG EULOODQW",
	},
	Sample {
		name: "Mystery Text",
		ciphertext: "EUXWH IRUFH DWWDFNV DUH FRPPRQ LQ FUSWRJUDSKB ZKHQ BRX FDQQRW ILQG WKH NHB WUB DOO SRVVLEOH NHBV",
	},
];

/// Picks one of the built-in samples at random.
pub fn random_sample() -> &'static Sample {
	// SAMPLES is never empty
	SAMPLES.choose(&mut rand::rng()).unwrap_or(&SAMPLES[0])
}
