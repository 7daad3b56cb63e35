pub mod compose;
pub mod form;
pub mod format;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use self::format::{digitos_max, formatar_pdv, formatar_valor, texto_max, MAX_TEXTO};

/// Request mode selected on the form. Exactly one is active at a time and it
/// decides which fields are required and how the order code is constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modo {
    Alterar,
    Adicionar,
    Excluir,
}

impl Modo {
    pub fn rotulo(&self) -> &'static str {
        match self {
            Modo::Alterar => "Alterar",
            Modo::Adicionar => "Adicionar",
            Modo::Excluir => "Excluir",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Modo::Alterar => "\u{1F500}",   // 🔀
            Modo::Adicionar => "\u{23EB}",  // ⏫
            Modo::Excluir => "\u{274C}",    // ❌
        }
    }

    /// Order code length: 3 digits for the sector in `adicionar`, 4 for the
    /// order number in `alterar`/`excluir`.
    pub fn pedido_digitos(&self) -> usize {
        match self {
            Modo::Adicionar => 3,
            Modo::Alterar | Modo::Excluir => 4,
        }
    }

    /// `excluir` cancels a whole order and carries no line items.
    pub fn tem_itens(&self) -> bool {
        !matches!(self, Modo::Excluir)
    }

    /// `adicionar` identifies the customer by PDV code, the others by name.
    pub fn usa_pdv(&self) -> bool {
        matches!(self, Modo::Adicionar)
    }
}

/// One product line of a despacho.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct Item {
    #[validate(custom(function = "codigo_de_produto"))]
    pub codigo: String,
    pub pacotes: String,
    pub descricao: String,
    pub valor: Option<String>,
}

impl Item {
    /// Items the user added but never touched are dropped at finalization.
    pub fn em_branco(&self) -> bool {
        self.codigo.is_empty()
            && self.pacotes.is_empty()
            && self.descricao.is_empty()
            && self.valor.is_none()
    }
}

fn codigo_de_produto(codigo: &str) -> Result<(), ValidationError> {
    if format::codigo_valido(codigo) {
        return Ok(());
    }
    let mut err = ValidationError::new("codigo_invalido");
    err.message = Some("Código deve ter 6 dígitos e começar com 90".into());
    Err(err)
}

fn erro_campo(code: &'static str, mensagem: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(mensagem.into());
    err
}

/// A finalized request, read-only from here on: blank items already dropped,
/// every field normalized. This is what gets validated and composed.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Despacho {
    pub modo: Modo,
    pub pedido: String,
    pub cliente: String,
    pub pdv: String,
    pub observacao: Option<String>,
    #[validate(nested)]
    pub itens: Vec<Item>,
}

/// Raw submission payload for the one-shot endpoint. Field values arrive as
/// typed by the user and are normalized through the same formatters the
/// session reducer applies per keystroke.
#[derive(Debug, Deserialize)]
pub struct DespachoEntrada {
    pub modo: Modo,
    #[serde(default)]
    pub pedido: String,
    #[serde(default)]
    pub cliente: String,
    #[serde(default)]
    pub pdv: String,
    #[serde(default)]
    pub observacao: String,
    #[serde(default)]
    pub itens: Vec<ItemEntrada>,
}

#[derive(Debug, Deserialize)]
pub struct ItemEntrada {
    #[serde(default)]
    pub codigo: String,
    #[serde(default)]
    pub pacotes: String,
    #[serde(default)]
    pub descricao: String,
    pub valor: Option<String>,
}

impl Despacho {
    /// Normalizes a raw payload into a finalized request.
    pub fn montar(entrada: DespachoEntrada) -> Self {
        let modo = entrada.modo;
        let itens = if modo.tem_itens() {
            entrada
                .itens
                .iter()
                .map(|i| Item {
                    codigo: digitos_max(&i.codigo, 6),
                    pacotes: digitos_max(&i.pacotes, 5),
                    descricao: texto_max(&i.descricao, MAX_TEXTO).to_uppercase(),
                    valor: i
                        .valor
                        .as_deref()
                        .map(formatar_valor)
                        .filter(|v| !v.is_empty()),
                })
                .filter(|i| !i.em_branco())
                .collect()
        } else {
            Vec::new()
        };

        let observacao = entrada.observacao.trim();
        Despacho {
            modo,
            pedido: digitos_max(&entrada.pedido, modo.pedido_digitos()),
            cliente: texto_max(&entrada.cliente, MAX_TEXTO),
            pdv: formatar_pdv(&entrada.pdv),
            observacao: (!observacao.is_empty())
                .then(|| texto_max(observacao, format::MAX_OBSERVACAO)),
            itens,
        }
    }

    /// Full submission check: per-item product codes via the derived rules,
    /// plus the mode-dependent required fields.
    pub fn validar(&self) -> Result<(), ValidationErrors> {
        let mut erros = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };

        if self.pedido.len() != self.modo.pedido_digitos() {
            let mensagem = match self.modo {
                Modo::Adicionar => "Informe o setor (3 dígitos)",
                Modo::Alterar | Modo::Excluir => "Informe o número do pedido (4 dígitos)",
            };
            erros.add("pedido", erro_campo("pedido_incompleto", mensagem));
        }

        if self.modo.usa_pdv() {
            // Complete PDV is 8 digits rendered as NNNN-NNNN.
            if self.pdv.len() != 9 {
                erros.add(
                    "pdv",
                    erro_campo("pdv_incompleto", "PDV incompleto. Use o formato 0000-0000"),
                );
            }
        } else if self.cliente.trim().is_empty() {
            erros.add("cliente", erro_campo("cliente_obrigatorio", "Informe o cliente"));
        }

        if self.modo.tem_itens() && self.itens.is_empty() {
            erros.add(
                "itens",
                erro_campo("itens_vazios", "Inclua ao menos um produto"),
            );
        }

        if erros.is_empty() {
            Ok(())
        } else {
            Err(erros)
        }
    }
}
