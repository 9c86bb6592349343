//! Fixed copy and strategy templates.
//!
//! Copy templates carry `{{placeholder}}` markers filled by
//! [`render`]: `name`, `description`, `price`, `target`,
//! `target_capitalized` and `installment`. Strategy templates are returned
//! verbatim.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([a-z_]+)\}\}").expect("placeholder pattern is valid")
});

/// Replace every known `{{key}}` with its value. Unknown keys are left as-is.
pub fn render(template: &str, values: &HashMap<&str, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &regex::Captures<'_>| {
            values
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub const HEADLINE: &str = r#"Headline Sugerido:

"Transforme Seu Negócio Digital Em Uma Máquina de Vendas Automatizada"

Alternativas:
1. "Triplique Suas Vendas Em 30 Dias Com Nossa Metodologia Comprovada"
2. "O Sistema Completo Para Escalar Seu Infoproduto de {{price}} a R$ 100k/Mês"
3. "Descubra o Segredo dos Top 1% de Vendedores Digitais"
4. "{{name}}: Transforme {{target}} em Empreendedores de Seis Dígitos"
5. "Ganhe {{price}} Vendendo {{description}} Este Mês""#;

pub const EMAIL: &str = r#"Assunto: Você está deixando dinheiro na mesa

---

Olá,

Enquanto você lê este email, seus concorrentes estão faturando MUITO mais que você.

E não é porque eles têm um produto melhor...

É porque eles descobriram o {{name}} que eu vou revelar para você hoje.

Esse mesmo {{name}} que transformou:

✓ João de R$ 3k para R$ 85k/mês em 4 meses
✓ Maria de zero a R$ 50k/mês em apenas 60 dias
✓ Pedro de R$ 10k para R$ 200k/mês em 6 meses

E agora é a SUA vez.

O que você vai receber:

{{description}}

Valor da oferta: {{price}}
Mas se você agir HOJE: 50% OFF

[CLIQUE AQUI PARA GARANTIR SEU ACESSO]

P.S.: Esta oferta especial expira em 24 horas. Depois volta ao preço normal."#;

pub const VSL: &str = r#"Script VSL - Primeira Página (0:00 a 0:45)

"Pare tudo que você está fazendo...

Se você é {{target}} e ainda não está faturando pelo menos R$ 30.000 por mês, você PRECISA ver isso.

Nos próximos minutos, vou te mostrar o sistema EXATO que usei para ir de R$ 0 a R$ 150.000 em apenas 90 dias...

E o melhor: você pode copiar tudo isso começando HOJE, mesmo se você nunca vendeu NADA online."

[PROBLEMA - 0:45 a 2:30]

"Você já sentiu que está fazendo TUDO certo...

Criou o {{name}}...
Fez as páginas de venda...
Gravou os vídeos...

Mas as vendas simplesmente NÃO APARECEM?

Eu sei exatamente como você se sente...
Porque eu também já passei por isso.

Gastei R$ 50 mil em cursos.
Tentei tudo o que ensinavam.

Mas NADA funcionava.

Até que eu descobri isso...""#;

pub const LANDING: &str = r#"Copy para Landing Page - {{name}}

[HERO SECTION]

Título Principal:
"Transforme {{target}} Em Máquinas de Vender Online"

Subtítulo:
"Descubra como {{description}} usando a metodologia que já gerou R$ 2.5 milhões em vendas"

CTA Primária: [GARANTIR MEU ACESSO AGORA]

[SEÇÃO DE BENEFÍCIOS]

✓ {{description}}
Implemente rápido, veja resultados em 7 dias

✓ Sistema Comprovado
Usado por mais de 5 mil {{target}}

✓ Suporte VIP
Acesso direto ao nosso time

✓ Garantia de 30 Dias
Se não gostar, seu dinheiro de volta

[PROVA SOCIAL]

"Em 30 dias saí de R$ 5k para R$ 47k/mês"
- Carlos Silva, São Paulo

"Finalmente consegui escalar meu negócio"
- Maria Santos, Rio de Janeiro"#;

pub const ADS: &str = r#"Copy para Anúncio - {{name}}

[VERSÃO 1 - GANCHO DIRETO]

Título: "R$ 50.000 em 30 Dias"

Texto: {{target_capitalized}} que querem R$ 50k/mês devem ver isso. Método comprovado. Acesso imediato.

CTA: Quero Ver o Método

---

[VERSÃO 2 - PROBLEMA]

Título: "Cansado de Trabalhar Duro e Ganhar Pouco?"

Texto: E se existisse um jeito de ganhar em 1 mês o que você ganha em 1 ano? {{name}}. Resultados reais. Veja a prova.

CTA: Garantir Acesso Agora

---

[VERSÃO 3 - CURIOSIDADE]

Título: "O Segredo dos R$ 100k/Mês"

Texto: Não é sorte. Não é dom. É {{name}} que qualquer pessoa pode copiar. Clique e veja.

CTA: Descobrir Como"#;

pub const CHECKOUT: &str = r#"Copy para Página de Checkout - {{name}}

[ACIMA DO FORMULÁRIO]

🔥 Oferta Especial Termina em: [CONTADOR 23:59]

"Você está a 1 clique de transformar seu negócio com {{name}}"

O que você vai receber HOJE:

✅ Acesso vitalício ao {{name}}
✅ {{description}}
✅ Suporte prioritário por 90 dias
✅ Grupo VIP de networking
✅ Atualizações gratuitas
✅ Bônus exclusivos (valor R$ 3.497)

Valor Total: R$ 7.994

[DESTAQUE PRINCIPAL]

HOJE APENAS: {{price}}
Ou 12x de R$ {{installment}}

[ABAIXO DO BOTÃO]

🔒 Compra 100% Segura - SSL Protegido
✅ Garantia de 30 Dias ou Dinheiro de Volta
💳 Parcelamos em até 12x

"Comece hoje, veja resultados em 7 dias ou seu dinheiro de volta""#;

/// A multi-phase plan returned for `strategy` requests.
#[derive(Debug, Clone, Copy)]
pub struct StrategyTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub metrics: &'static str,
}

impl StrategyTemplate {
    pub fn render(&self) -> String {
        format!("{}\n\n{}\n\n📊 {}", self.title, self.description, self.metrics)
    }
}

pub const STRATEGIES: [StrategyTemplate; 3] = [
    StrategyTemplate {
        title: "Estratégia de Lançamento Semente",
        description: "FASE 1: PRÉ-LANÇAMENTO (7 dias)

1. Conteúdo de Valor
- Poste 3-5 conteúdos por dia sobre o problema
- Stories mostrando bastidores
- Enquetes para engajar a audiência

2. Aquecimento
- Anuncie que algo grande está vindo
- Crie expectativa sem revelar detalhes
- Abra lista de espera

FASE 2: LANÇAMENTO (4 dias)

Dia 1: Abertura
- Webinar ou VSL revelando a solução
- Oferta com bônus limitados
- Contador regressivo de 96h

Dia 2-3: Nutrição
- Depoimentos de beta testers
- Quebra de objeções
- FAQ ao vivo

Dia 4: Encerramento
- Último dia com urgência
- Bônus extra para últimas horas
- Fechamento às 23:59

FASE 3: PÓS-LANÇAMENTO

- Follow-up com quem não comprou
- Oferta especial com desconto (48h)
- Análise de métricas",
        metrics: "Taxa de conversão esperada: 3-8%",
    },
    StrategyTemplate {
        title: "Funil Evergreen de Alto Ticket",
        description: "ESTRUTURA COMPLETA:

1. TRÁFEGO (Dia 0)
- Anúncios no Facebook/Instagram
- Público: Empreendedores 25-45 anos
- Budget: R$ 100-300/dia

2. CAPTURA (Dias 0-1)
- Landing page com lead magnet
- Ebook/Webinar grátis
- Taxa de conversão: 35-50%

3. NUTRIÇÃO (Dias 2-7)
- Sequência de 5-7 emails
- Conteúdo de valor + vendas
- Direcionamento para VSL

4. VENDA (Dia 7+)
- VSL de 20-30 minutos
- Oferta clara e urgente
- Checkout com upsell

5. PÓS-VENDA
- Onboarding automatizado
- Remarketing para não-compradores
- Upsells adicionais

INVESTIMENTO:
- R$ 3.000-10.000/mês em tráfego
- ROI esperado: 3x-8x",
        metrics: "Meta mensal: R$ 30k-100k",
    },
    StrategyTemplate {
        title: "Sistema de Afiliados Escalável",
        description: "FASE 1: ESTRUTURAÇÃO

1. Produto e Comissões
- Defina comissão atrativa (30-50%)
- Crie materiais de divulgação
- Configure tracking avançado

2. Recrutamento Inicial
- Identifique 10-20 afiliados estratégicos
- Grandes audiências no seu nicho
- Ofereça exclusividade inicial

FASE 2: ATIVAÇÃO

1. Treinamento
- Webinar de onboarding
- Scripts e swipe files
- Melhores práticas

2. Materiais
- Anúncios prontos
- Emails de promoção
- Stories e posts

3. Suporte
- Grupo exclusivo no Telegram
- Suporte prioritário
- Calls semanais

FASE 3: ESCALA

1. Gamificação
- Ranking de afiliados
- Prêmios por performance
- Bônus progressivos

2. Expansão
- Abrir para mais afiliados
- Criar níveis (bronze, prata, ouro)
- Desenvolver super afiliados

RESULTADO:
- 50-200 afiliados ativos
- 60-80% das vendas via afiliados
- Crescimento orgânico exponencial",
        metrics: "Meta: 100+ afiliados em 90 dias",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_known_keys() {
        let mut values = HashMap::new();
        values.insert("name", "Curso X".to_string());
        let out = render("Compre {{name}} agora, {{name}}!", &values);
        assert_eq!(out, "Compre Curso X agora, Curso X!");
    }

    #[test]
    fn render_leaves_unknown_keys() {
        let values = HashMap::new();
        assert_eq!(render("{{missing}} ok", &values), "{{missing}} ok");
    }

    #[test]
    fn replacement_text_is_literal() {
        let mut values = HashMap::new();
        values.insert("price", "$1 {{name}}".to_string());
        values.insert("name", "X".to_string());
        assert_eq!(render("{{price}}", &values), "$1 {{name}}");
    }

    #[test]
    fn strategy_render_layout() {
        let out = STRATEGIES[1].render();
        assert!(out.starts_with("Funil Evergreen de Alto Ticket\n\n"));
        assert!(out.ends_with("\n\n📊 Meta mensal: R$ 30k-100k"));
    }
}
